//! Configuration options for PC/SC transport and card discovery

use std::time::Duration;

use pcsc::{Protocols as PcscProtocols, ShareMode as PcscShareMode};

/// Sharing mode for card connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMode {
    /// Exclusive access to the card
    Exclusive,
    /// Shared access to the card (default)
    Shared,
    /// Direct connection to the reader
    Direct,
}

impl From<ShareMode> for PcscShareMode {
    fn from(mode: ShareMode) -> Self {
        match mode {
            ShareMode::Exclusive => Self::Exclusive,
            ShareMode::Shared => Self::Shared,
            ShareMode::Direct => Self::Direct,
        }
    }
}

/// Configuration options for PC/SC transport
#[derive(Debug, Clone)]
pub struct PcscConfig {
    /// Sharing mode for card connections
    pub share_mode: ShareMode,

    /// Preferred protocols for card communication
    pub protocols: PcscProtocols,
}

impl Default for PcscConfig {
    fn default() -> Self {
        Self {
            share_mode: ShareMode::Shared,
            protocols: PcscProtocols::ANY,
        }
    }
}

impl PcscConfig {
    /// Set the sharing mode
    pub const fn with_share_mode(mut self, mode: ShareMode) -> Self {
        self.share_mode = mode;
        self
    }
}

/// Expected ATR, optionally masked
///
/// The ATR must have the same length as the pattern. When a mask is given,
/// only the bits set in the mask are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtrPattern {
    atr: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl AtrPattern {
    /// Match this ATR byte for byte
    pub const fn exact(atr: Vec<u8>) -> Self {
        Self { atr, mask: None }
    }

    /// Match this ATR under a bit mask of the same length
    pub const fn masked(atr: Vec<u8>, mask: Vec<u8>) -> Self {
        Self {
            atr,
            mask: Some(mask),
        }
    }

    /// The expected ATR bytes
    pub fn atr(&self) -> &[u8] {
        &self.atr
    }

    /// Check a card's ATR against this pattern
    pub fn matches(&self, atr: &[u8]) -> bool {
        if atr.len() != self.atr.len() {
            return false;
        }

        match &self.mask {
            Some(mask) => {
                mask.len() == self.atr.len()
                    && atr
                        .iter()
                        .zip(&self.atr)
                        .zip(mask)
                        .all(|((a, p), m)| a & m == p & m)
            }
            None => atr == self.atr.as_slice(),
        }
    }
}

/// What to wait for when discovering a card
#[derive(Debug, Clone)]
pub struct CardRequest {
    /// ATR the card must present
    pub atr: AtrPattern,
    /// Restrict discovery to this reader
    pub reader: Option<String>,
    /// How long to wait for a matching card
    pub timeout: Duration,
}

impl CardRequest {
    /// Default discovery timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Wait on any reader for a card matching `atr`
    pub const fn new(atr: AtrPattern) -> Self {
        Self {
            atr,
            reader: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Only consider the named reader
    pub fn with_reader(mut self, reader: impl Into<String>) -> Self {
        self.reader = Some(reader.into());
        self
    }

    /// Set the discovery timeout
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check whether a reader is eligible for this request
    pub fn accepts_reader(&self, name: &str) -> bool {
        self.reader.as_deref().is_none_or(|wanted| wanted == name)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn test_exact_atr() {
        let pattern = AtrPattern::exact(hex!("3B8F8001").to_vec());
        assert!(pattern.matches(&hex!("3B8F8001")));
        assert!(!pattern.matches(&hex!("3B8F8002")));
        assert!(!pattern.matches(&hex!("3B8F800100")));
        assert!(!pattern.matches(&hex!("3B8F80")));
    }

    #[test]
    fn test_masked_atr() {
        let pattern = AtrPattern::masked(hex!("3B8F8000").to_vec(), hex!("FFFFFF00").to_vec());
        assert!(pattern.matches(&hex!("3B8F8001")));
        assert!(pattern.matches(&hex!("3B8F80FF")));
        assert!(!pattern.matches(&hex!("3B8F8101")));

        let short_mask = AtrPattern::masked(hex!("3B8F").to_vec(), hex!("FF").to_vec());
        assert!(!short_mask.matches(&hex!("3B8F")));
    }

    #[test]
    fn test_config_share_mode() {
        assert_eq!(PcscConfig::default().share_mode, ShareMode::Shared);

        let config = PcscConfig::default().with_share_mode(ShareMode::Exclusive);
        assert_eq!(config.share_mode, ShareMode::Exclusive);
    }

    #[test]
    fn test_card_request_reader_filter() {
        let request = CardRequest::new(AtrPattern::exact(vec![0x3B]));
        assert!(request.accepts_reader("ACS ACR1552 1S CL Reader PICC"));
        assert_eq!(request.timeout, CardRequest::DEFAULT_TIMEOUT);

        let request = request
            .with_reader("Reader A")
            .with_timeout(Duration::from_millis(250));
        assert!(request.accepts_reader("Reader A"));
        assert!(!request.accepts_reader("Reader B"));
        assert_eq!(request.timeout, Duration::from_millis(250));
    }
}
