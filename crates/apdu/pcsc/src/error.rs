//! Error types for PC/SC transport

use ultralight_apdu_core::TransportError;

/// PC/SC-specific errors
#[derive(Debug, thiserror::Error)]
pub enum PcscError {
    /// PC/SC error
    #[error("PC/SC error: {0}")]
    Pcsc(#[from] pcsc::Error),

    /// No readers available
    #[error("No readers available")]
    NoReadersAvailable,

    /// Reader not found
    #[error("Reader not found: {0}")]
    ReaderNotFound(String),

    /// No card present in reader
    #[error("No card present in reader: {0}")]
    NoCard(String),

    /// No matching card appeared before the discovery timeout
    #[error("No matching card presented within the timeout")]
    Timeout,

    /// A card was present but its ATR did not match the request
    #[error("Card ATR {} does not match expected {}", hex::encode_upper(actual), hex::encode_upper(expected))]
    CardMismatch {
        /// Expected ATR
        expected: Vec<u8>,
        /// ATR reported by the card
        actual: Vec<u8>,
    },

    /// Card was removed
    #[error("Card was removed")]
    CardRemoved,
}

impl From<PcscError> for TransportError {
    fn from(error: PcscError) -> Self {
        match error {
            PcscError::Pcsc(pcsc::Error::Timeout) | PcscError::Timeout => Self::Timeout,
            PcscError::Pcsc(pcsc::Error::CommError) => Self::Transmission,
            PcscError::Pcsc(pcsc::Error::ReaderUnavailable) => Self::Device,
            PcscError::NoCard(_) | PcscError::CardRemoved => Self::Connection,
            PcscError::Pcsc(e) => Self::Driver(e as i32),
            other => Self::other(other.to_string()),
        }
    }
}
