//! Reader representation for PC/SC devices

use pcsc::{ReaderState, State};

/// Representation of a PC/SC card reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcscReader {
    /// Name of the reader
    name: String,

    /// Answer To Reset of the card, if one is present
    atr: Option<Vec<u8>>,
}

impl PcscReader {
    /// Create a new reader
    pub const fn new(name: String, atr: Option<Vec<u8>>) -> Self {
        Self { name, atr }
    }

    /// Get the reader name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if a card is present in the reader
    pub const fn has_card(&self) -> bool {
        self.atr.is_some()
    }

    /// Get the ATR of the card if present
    pub fn atr(&self) -> Option<&[u8]> {
        self.atr.as_deref()
    }

    /// Create a reader from a reader state
    pub(crate) fn from_reader_state(reader_state: &ReaderState) -> Self {
        let event_state = reader_state.event_state();
        let has_card = event_state.contains(State::PRESENT) && !event_state.contains(State::EMPTY);

        Self {
            name: reader_state.name().to_string_lossy().into_owned(),
            atr: has_card.then(|| reader_state.atr().to_vec()),
        }
    }
}
