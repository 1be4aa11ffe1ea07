//! Device manager for PC/SC operations

use std::ffi::CString;
use std::time::Instant;

use pcsc::{Context, ReaderState, Scope, State};
use tracing::{debug, info};

use crate::config::{CardRequest, PcscConfig};
use crate::error::PcscError;
use crate::reader::PcscReader;
use crate::transport::PcscTransport;

/// Manager for PC/SC device operations
#[allow(missing_debug_implementations)]
pub struct PcscDeviceManager {
    /// PC/SC context
    context: Context,
}

impl PcscDeviceManager {
    /// Create a new PC/SC device manager
    pub fn new() -> Result<Self, PcscError> {
        let context = Context::establish(Scope::User)?;
        Ok(Self { context })
    }

    /// List all available card readers along with the card each one holds
    pub fn list_readers(&self) -> Result<Vec<PcscReader>, PcscError> {
        let mut states = self.reader_states()?;
        if states.is_empty() {
            return Err(PcscError::NoReadersAvailable);
        }

        // Poll the current state without blocking
        self.context
            .get_status_change(Some(std::time::Duration::ZERO), &mut states)?;

        Ok(states.iter().map(PcscReader::from_reader_state).collect())
    }

    /// Open a connection to a specific reader
    pub fn open_reader(&self, reader_name: &str) -> Result<PcscTransport, PcscError> {
        self.open_reader_with_config(reader_name, PcscConfig::default())
    }

    /// Open a connection to a specific reader with custom configuration
    pub fn open_reader_with_config(
        &self,
        reader_name: &str,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        // Clone the context to provide ownership to the transport
        PcscTransport::new(self.context.clone(), reader_name, config)
    }

    /// Block until a card matching `request` is presented, then connect to it
    ///
    /// Returns [`PcscError::CardMismatch`] if the timeout elapses while only
    /// non-matching cards were seen, and [`PcscError::Timeout`] if no card
    /// was seen at all.
    pub fn wait_for_card(
        &self,
        request: &CardRequest,
        config: PcscConfig,
    ) -> Result<PcscTransport, PcscError> {
        let deadline = Instant::now() + request.timeout;
        let mut mismatched: Option<Vec<u8>> = None;

        loop {
            let mut states = self.reader_states()?;
            states.retain(|rs| request.accepts_reader(&rs.name().to_string_lossy()));
            states.push(ReaderState::new(pcsc::PNP_NOTIFICATION(), State::UNAWARE));

            // Poll the current state without blocking
            match self
                .context
                .get_status_change(Some(std::time::Duration::ZERO), &mut states)
            {
                Ok(()) | Err(pcsc::Error::Timeout) => {}
                Err(e) => return Err(e.into()),
            }

            let readers = states
                .iter()
                .filter(|rs| rs.name() != pcsc::PNP_NOTIFICATION())
                .map(PcscReader::from_reader_state);

            for reader in readers {
                let Some(atr) = reader.atr() else {
                    continue;
                };

                if request.atr.matches(atr) {
                    info!(reader = reader.name(), atr = %hex::encode_upper(atr), "Matching card found");
                    let transport = self.open_reader_with_config(reader.name(), config)?;
                    return Ok(transport);
                }

                debug!(reader = reader.name(), atr = %hex::encode_upper(atr), "Ignoring card with unexpected ATR");
                mismatched = Some(atr.to_vec());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(match mismatched {
                    Some(actual) => PcscError::CardMismatch {
                        expected: request.atr.atr().to_vec(),
                        actual,
                    },
                    None => PcscError::Timeout,
                });
            }

            // Block until some reader state changes or the deadline passes
            for rs in &mut states {
                rs.sync_current_state();
            }
            match self.context.get_status_change(Some(remaining), &mut states) {
                Ok(()) | Err(pcsc::Error::Timeout) => {}
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Fresh reader states for every attached reader
    fn reader_states(&self) -> Result<Vec<ReaderState>, PcscError> {
        let readers: Vec<CString> = match self.context.list_readers_owned() {
            Ok(readers) => readers,
            Err(pcsc::Error::NoReadersAvailable) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(readers
            .into_iter()
            .map(|name| ReaderState::new(name, State::UNAWARE))
            .collect())
    }
}
