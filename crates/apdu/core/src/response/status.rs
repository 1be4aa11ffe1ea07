//! Status word definitions for reader responses

use std::fmt;

use tracing::Level;

/// Status Word (SW1-SW2) terminating a reader response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusWord {
    /// First status byte (SW1)
    pub sw1: u8,
    /// Second status byte (SW2)
    pub sw2: u8,
}

impl StatusWord {
    /// Create a new status word
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self { sw1, sw2 }
    }

    /// Check if this status word indicates success (90 00)
    pub const fn is_success(&self) -> bool {
        self.sw1 == 0x90 && self.sw2 == 0x00
    }

    /// Get the appropriate tracing level for this status word
    pub const fn tracing_level(&self) -> Level {
        if self.is_success() {
            Level::DEBUG
        } else if self.sw1 == 0x62 || self.sw1 == 0x63 {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    /// Get a description of this status word
    ///
    /// Readers reuse the ISO/IEC 7816-4 codes for their own envelope errors,
    /// so this covers the codes seen when a relayed card command fails.
    pub const fn description(&self) -> &'static str {
        match (self.sw1, self.sw2) {
            (0x90, 0x00) => "Success",
            (0x62, 0x82) => "End of data reached before expected length",
            (0x63, 0x00) => "No information given (card did not answer)",
            (0x64, 0x01) => "Reader timeout waiting for the card",
            (0x67, 0x00) => "Wrong length",
            (0x68, 0x00) => "Function in CLA not supported",
            (0x69, 0x82) => "Security status not satisfied",
            (0x69, 0x85) => "Conditions of use not satisfied",
            (0x69, 0x86) => "Command not allowed",
            (0x6A, 0x81) => "Function not supported",
            (0x6A, 0x82) => "File or application not found",
            (0x6A, 0x86) => "Incorrect parameters P1-P2",
            (0x6B, 0x00) => "Wrong parameters P1-P2",
            (0x6D, 0x00) => "Instruction code not supported or invalid",
            (0x6E, 0x00) => "Class not supported",
            (0x6F, 0x00) => "No precise diagnosis",
            _ => "Unknown status word",
        }
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X} {:02X}", self.sw1, self.sw2)
    }
}
