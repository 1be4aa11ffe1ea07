//! Reader response definitions
//!
//! A reader answers every APDU with zero or more payload bytes followed by
//! the two status bytes SW1 and SW2.

pub mod error;
pub mod status;

use bytes::Bytes;
use tracing::trace;

use error::{ResponseError, StatusError};
use status::StatusWord;

/// Basic reader response: payload plus status word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Response payload data, empty when the reader only sent a status word
    payload: Bytes,
    /// Status word
    status: StatusWord,
}

impl Response {
    /// Parse response from raw bytes (including status word)
    pub fn from_bytes(data: &[u8]) -> Result<Self, ResponseError> {
        let Some((payload, &[sw1, sw2])) = data.split_last_chunk::<2>() else {
            return Err(ResponseError::Incomplete(data.len()));
        };
        let status = StatusWord::new(sw1, sw2);

        trace!(
            sw1 = format_args!("{:#04x}", status.sw1),
            sw2 = format_args!("{:#04x}", status.sw2),
            payload_len = payload.len(),
            "Parsed reader response"
        );

        Ok(Self {
            payload: Bytes::copy_from_slice(payload),
            status,
        })
    }

    /// Get the response payload
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get the status word
    pub const fn status(&self) -> StatusWord {
        self.status
    }

    /// Check if the response indicates success
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Consume the response, yielding the payload only on success
    pub fn into_payload_result(self) -> Result<Bytes, StatusError> {
        if self.is_success() {
            Ok(self.payload)
        } else {
            Err(StatusError::new(self.status.sw1, self.status.sw2))
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_response_from_bytes() {
        let resp = Response::from_bytes(&hex!("0102039000")).unwrap();
        assert_eq!(resp.payload(), &hex!("010203"));
        assert_eq!(resp.status(), StatusWord::new(0x90, 0x00));
        assert!(resp.is_success());

        let resp = Response::from_bytes(&hex!("6A82")).unwrap();
        assert!(resp.payload().is_empty());
        assert_eq!(resp.status(), StatusWord::new(0x6A, 0x82));
        assert!(!resp.is_success());
    }

    #[test]
    fn test_response_incomplete() {
        assert_eq!(
            Response::from_bytes(&[0x90]),
            Err(ResponseError::Incomplete(1))
        );
        assert_eq!(Response::from_bytes(&[]), Err(ResponseError::Incomplete(0)));
    }

    #[test]
    fn test_response_into_payload_result() {
        let success = Response::from_bytes(&hex!("AABB9000")).unwrap();
        assert_eq!(success.into_payload_result().unwrap().as_ref(), &[0xAA, 0xBB]);

        let error = Response::from_bytes(&hex!("01026A82")).unwrap();
        let err = error.into_payload_result().unwrap_err();
        assert_eq!(err.status, StatusWord::new(0x6A, 0x82));
        assert_eq!(err.to_string(), "Status error 6A 82: File or application not found");
    }
}
