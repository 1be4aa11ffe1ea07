//! Error types specific to reader responses

use thiserror::Error;

use super::status::StatusWord;

/// A response carried a status word other than 90 00
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Status error {status}: {}", status.description())]
pub struct StatusError {
    /// Status word that caused the error
    pub status: StatusWord,
}

impl StatusError {
    /// Create a new status error
    pub const fn new(sw1: u8, sw2: u8) -> Self {
        Self {
            status: StatusWord::new(sw1, sw2),
        }
    }
}

/// Error for reader response processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    /// Response shorter than the two status bytes
    #[error("Incomplete response: {0} bytes, no status word")]
    Incomplete(usize),
}
