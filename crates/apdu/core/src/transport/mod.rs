//! Transport traits for raw APDU communication with a reader
//!
//! A transport moves bytes to and from the reader. It has no knowledge of
//! reader envelopes, status word policy, or the card's command set.

pub mod error;

use std::fmt;

use bytes::Bytes;
pub use error::TransportError;
use tracing::{debug, trace};

/// Trait for basic card transports
///
/// The returned bytes are the complete reader answer, status word included.
pub trait CardTransport: Send + fmt::Debug {
    /// Send raw APDU bytes to the reader and return its response bytes
    fn transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        trace!(command = %hex::encode_upper(command), "Transmitting raw command");
        let result = self.do_transmit_raw(command);
        match &result {
            Ok(response) => {
                trace!(response = %hex::encode_upper(response), "Received raw response");
            }
            Err(e) => {
                debug!(error = ?e, "Transport error during transmission");
            }
        }
        result
    }

    /// Internal implementation of transmit_raw
    ///
    /// This is the method that concrete implementations should override.
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError>;

    /// Check if the transport is connected to a physical card
    fn is_connected(&self) -> bool;
}

impl<T: CardTransport + ?Sized> CardTransport for &mut T {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

impl<T: CardTransport + ?Sized> CardTransport for Box<T> {
    fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
        (**self).do_transmit_raw(command)
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays canned responses in order and records every command
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        responses: Vec<Bytes>,
        commands: Vec<Bytes>,
    }

    impl CardTransport for ScriptedTransport {
        fn do_transmit_raw(&mut self, command: &[u8]) -> Result<Bytes, TransportError> {
            self.commands.push(Bytes::copy_from_slice(command));
            if self.responses.is_empty() {
                return Err(TransportError::Transmission);
            }
            Ok(self.responses.remove(0))
        }

        fn is_connected(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_transmit_raw_delegates() {
        let mut transport = ScriptedTransport {
            responses: vec![Bytes::from_static(&[0x90, 0x00])],
            ..Default::default()
        };

        let response = transport.transmit_raw(&[0xFF, 0xCA, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(response.as_ref(), &[0x90, 0x00]);
        assert_eq!(transport.commands.len(), 1);

        assert_eq!(
            transport.transmit_raw(&[0x00]),
            Err(TransportError::Transmission)
        );
    }

    #[test]
    fn test_boxed_transport() {
        let mut transport: Box<dyn CardTransport> = Box::new(ScriptedTransport {
            responses: vec![Bytes::from_static(&[0x6A, 0x82])],
            ..Default::default()
        });

        assert!(transport.is_connected());
        assert_eq!(transport.transmit_raw(&[0x00]).unwrap().as_ref(), &[0x6A, 0x82]);
    }
}
