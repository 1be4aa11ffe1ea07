use bytes::Bytes;
use thiserror::Error;
use ultralight_apdu_core::{StatusWord, TransportError};

use crate::session::AuthState;

/// Result type for Ultralight-C operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Ultralight-C operations
#[derive(Debug, Error)]
pub enum Error {
    /// No matching card was presented before the discovery timeout
    #[error("No Ultralight-C card presented")]
    CardNotPresent,

    /// A card was presented but it is not the expected card type
    #[error("Card ATR {} does not match expected {}", hex::encode_upper(actual), hex::encode_upper(expected))]
    CardMismatch {
        /// Expected ATR
        expected: Vec<u8>,
        /// ATR reported by the card
        actual: Vec<u8>,
    },

    /// The reader answered with a status word other than 90 00
    #[error("Bad response {status} ({}) to command {}", status.description(), hex::encode_upper(command))]
    Transport {
        /// Status word returned by the reader
        status: StatusWord,
        /// Complete APDU that was rejected
        command: Bytes,
    },

    /// The link to the reader itself failed
    #[error(transparent)]
    Io(#[from] TransportError),

    /// Cipher input or block payload of the wrong size
    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// The card could not prove knowledge of the shared key
    #[error("Authentication failed: RndA does not match")]
    AuthenticationFailed,

    /// Operation not valid in the current authentication state
    #[error("Operation not allowed in state {0:?}")]
    InvalidState(AuthState),

    /// Key material could not be parsed
    #[error("Invalid key: {0}")]
    InvalidKey(&'static str),

    /// Block address outside the card's memory
    #[error("Block address {0:#04X} is outside the card's memory")]
    InvalidAddress(u8),

    /// The card or reader answered with an unexpected payload
    #[error("Malformed response: {0}")]
    MalformedResponse(&'static str),

    /// PC/SC failure during card discovery
    #[cfg(feature = "pcsc")]
    #[error(transparent)]
    Pcsc(ultralight_apdu_transport_pcsc::PcscError),
}

impl Error {
    /// Status word carried by a [`Error::Transport`] error
    pub const fn status(&self) -> Option<StatusWord> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "pcsc")]
impl From<ultralight_apdu_transport_pcsc::PcscError> for Error {
    fn from(error: ultralight_apdu_transport_pcsc::PcscError) -> Self {
        use ultralight_apdu_transport_pcsc::PcscError;

        match error {
            PcscError::Timeout | PcscError::NoCard(_) => Self::CardNotPresent,
            PcscError::CardMismatch { expected, actual } => Self::CardMismatch { expected, actual },
            other => Self::Pcsc(other),
        }
    }
}
