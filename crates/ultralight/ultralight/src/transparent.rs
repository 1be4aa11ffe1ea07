//! Transparent exchange framing
//!
//! The reader relays card commands verbatim when they are wrapped in its
//! transparent exchange envelope:
//!
//! ```text
//! FF C2 00 01 Lc 95 len <card command>
//! ```
//!
//! and answers with a fixed-size preamble, the card's answer, and the status
//! word of the envelope itself.

use bytes::Bytes;
use tracing::{Level, debug, info, trace, warn};
use ultralight_apdu_core::{CardTransport, Response, StatusError};

use crate::{
    Error, Result,
    constants::reader::{
        CLA, DEFAULT_RESPONSE_HEADER_LEN, END_SESSION, INS_TRANSPARENT, P2_EXCHANGE,
        START_SESSION, SWITCH_PROTOCOL_14443A, TAG_TRANSCEIVE,
    },
    memory::Memory,
};

/// Largest card command that fits in a short envelope
pub const MAX_INNER_COMMAND_LEN: usize = u8::MAX as usize - 2;

/// Reader-specific framing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramerConfig {
    /// Bytes of reader preamble preceding the card's answer
    pub response_header_len: usize,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            response_header_len: DEFAULT_RESPONSE_HEADER_LEN,
        }
    }
}

impl FramerConfig {
    /// Set the preamble length stripped from every transceive answer
    pub const fn with_response_header_len(mut self, len: usize) -> Self {
        self.response_header_len = len;
        self
    }
}

/// Wraps card commands in the reader envelope and unwraps the answers
#[derive(Debug)]
pub struct TransparentFramer<T: CardTransport> {
    transport: T,
    config: FramerConfig,
}

impl<T: CardTransport> TransparentFramer<T> {
    /// Create a framer with the default reader configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, FramerConfig::default())
    }

    /// Create a framer with a custom reader configuration
    pub const fn with_config(transport: T, config: FramerConfig) -> Self {
        Self { transport, config }
    }

    /// The underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Start a transparent session and switch it to ISO 14443-4A
    pub fn open_session(&mut self) -> Result<()> {
        debug!("Starting transparent session");
        self.transmit_checked(&START_SESSION)?;

        if let Err(e) = self.transmit_checked(&SWITCH_PROTOCOL_14443A) {
            // The reader session is already started and must not be left open
            if let Err(close_err) = self.close_session() {
                warn!(error = %close_err, "Failed to end transparent session after protocol switch failed");
            }
            return Err(e);
        }
        Ok(())
    }

    /// End the transparent session
    pub fn close_session(&mut self) -> Result<()> {
        debug!("Ending transparent session");
        self.transmit_checked(&END_SESSION)?;
        Ok(())
    }

    /// Relay a card command and return the card's answer
    pub fn send(&mut self, inner: &[u8]) -> Result<Bytes> {
        let envelope = wrap(inner)?;
        let payload = self.transmit_checked(&envelope)?;

        let header_len = self.config.response_header_len;
        if payload.len() < header_len {
            return Err(Error::MalformedResponse(
                "reader answer shorter than its preamble",
            ));
        }

        let answer = payload.slice(header_len..);
        trace!(answer = %hex::encode_upper(&answer), "Card answer");
        Ok(answer)
    }

    /// Block accessor over this framer
    pub const fn memory(&mut self) -> Memory<'_, T> {
        Memory::new(self)
    }

    /// Transmit a complete APDU and require a 90 00 status word
    pub fn transmit_checked(&mut self, apdu: &[u8]) -> Result<Bytes> {
        let raw = self.transport.transmit_raw(apdu)?;
        let response = Response::from_bytes(&raw)
            .map_err(|_| Error::MalformedResponse("reader answer without status word"))?;

        response.into_payload_result().map_err(|StatusError { status }| {
            if status.tracing_level() == Level::INFO {
                info!(status = %status, command = %hex::encode_upper(apdu), "Reader rejected command: {}", status.description());
            } else {
                warn!(status = %status, command = %hex::encode_upper(apdu), "Reader rejected command: {}", status.description());
            }
            Error::Transport {
                status,
                command: Bytes::copy_from_slice(apdu),
            }
        })
    }
}

/// Wrap a card command in the transparent exchange envelope
pub fn wrap(inner: &[u8]) -> Result<Vec<u8>> {
    if inner.len() > MAX_INNER_COMMAND_LEN {
        return Err(Error::InvalidLength {
            expected: MAX_INNER_COMMAND_LEN,
            actual: inner.len(),
        });
    }

    let mut envelope = Vec::with_capacity(7 + inner.len());
    envelope.extend_from_slice(&[
        CLA,
        INS_TRANSPARENT,
        0x00,
        P2_EXCHANGE,
        (inner.len() + 2) as u8,
        TAG_TRANSCEIVE,
        inner.len() as u8,
    ]);
    envelope.extend_from_slice(inner);
    Ok(envelope)
}
