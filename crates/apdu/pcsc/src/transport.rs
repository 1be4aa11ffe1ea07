//! PC/SC transport implementation

use std::{ffi::CString, fmt};

use bytes::Bytes;
use pcsc::{Card, Context, Disposition};
use ultralight_apdu_core::{CardTransport, TransportError};

use crate::{config::PcscConfig, error::PcscError};

/// Transport implementation using PC/SC
pub struct PcscTransport {
    /// PC/SC context
    _context: Context,
    /// Card connection
    card: Option<Card>,
    /// Reader name
    reader_name: String,
    /// Configuration
    config: PcscConfig,
}

impl fmt::Debug for PcscTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PcscTransport")
            .field("reader_name", &self.reader_name)
            .field("has_card", &self.card.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl PcscTransport {
    /// Connect to the card in the specified reader
    pub(crate) fn new(
        context: Context,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<Self, PcscError> {
        let reader_cstr = CString::new(reader_name)
            .map_err(|_| PcscError::ReaderNotFound(reader_name.to_string()))?;

        let card = match context.connect(&reader_cstr, config.share_mode.into(), config.protocols)
        {
            Ok(card) => card,
            Err(pcsc::Error::NoSmartcard) => {
                return Err(PcscError::NoCard(reader_name.to_string()));
            }
            Err(pcsc::Error::UnknownReader) => {
                return Err(PcscError::ReaderNotFound(reader_name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            _context: context,
            card: Some(card),
            reader_name: reader_name.to_string(),
            config,
        })
    }

    /// Get the reader name
    pub fn reader_name(&self) -> &str {
        &self.reader_name
    }

    /// Transmit a command to the card
    fn transmit_command(&mut self, command: &[u8]) -> Result<Bytes, PcscError> {
        let card = self
            .card
            .as_mut()
            .ok_or_else(|| PcscError::NoCard(self.reader_name.clone()))?;

        let mut response_buffer = [0u8; pcsc::MAX_BUFFER_SIZE];

        match card.transmit(command, &mut response_buffer) {
            Ok(response) => Ok(Bytes::copy_from_slice(response)),
            Err(pcsc::Error::RemovedCard | pcsc::Error::ResetCard) => {
                // The session is gone with the card, there is nothing to resume
                self.card = None;
                Err(PcscError::CardRemoved)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl CardTransport for PcscTransport {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        self.transmit_command(command).map_err(TransportError::from)
    }

    fn is_connected(&self) -> bool {
        self.card.is_some()
    }
}

impl Drop for PcscTransport {
    fn drop(&mut self) {
        if let Some(card) = self.card.take() {
            let _ = card.disconnect(Disposition::LeaveCard);
        }
    }
}
