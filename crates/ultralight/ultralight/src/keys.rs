//! Shared key handling

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    Error, Result,
    constants::FACTORY_KEY,
    crypto::ExpandedKey,
};

/// Length of one key half in bytes
pub const KEY_HALF_LEN: usize = 8;

/// 2-key Triple-DES key shared between the host and the card
///
/// Stored as KEY1 || KEY2 and expanded to K1 || K2 || K1 only for the
/// duration of a cipher operation.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedKey([u8; 2 * KEY_HALF_LEN]);

impl SharedKey {
    /// Create a key from its two 8-byte halves
    pub fn from_halves(key1: [u8; KEY_HALF_LEN], key2: [u8; KEY_HALF_LEN]) -> Self {
        let mut key = [0u8; 2 * KEY_HALF_LEN];
        key[..KEY_HALF_LEN].copy_from_slice(&key1);
        key[KEY_HALF_LEN..].copy_from_slice(&key2);
        Self(key)
    }

    /// Parse a key from two 16-character hex strings
    pub fn from_hex(key1: &str, key2: &str) -> Result<Self> {
        let mut key = Zeroizing::new([0u8; 2 * KEY_HALF_LEN]);
        hex::decode_to_slice(key1.trim(), &mut key[..KEY_HALF_LEN])
            .map_err(|_| Error::InvalidKey("KEY1 must be 16 hex characters"))?;
        hex::decode_to_slice(key2.trim(), &mut key[KEY_HALF_LEN..])
            .map_err(|_| Error::InvalidKey("KEY2 must be 16 hex characters"))?;
        Ok(Self(*key))
    }

    /// The publicly documented factory key
    ///
    /// Every blank card ships with it. It offers no protection and is only
    /// useful for provisioning or demonstrations.
    pub const fn factory_default() -> Self {
        Self(FACTORY_KEY)
    }

    /// Check whether this is the factory key
    pub fn is_factory_default(&self) -> bool {
        *self == Self::factory_default()
    }

    /// Expand to the three-key form used by the cipher
    pub fn expand(&self) -> Zeroizing<ExpandedKey> {
        let mut expanded = Zeroizing::new([0u8; 24]);
        expanded[..16].copy_from_slice(&self.0);
        expanded[16..].copy_from_slice(&self.0[..KEY_HALF_LEN]);
        expanded
    }

    /// Raw key bytes, KEY1 || KEY2
    pub const fn as_bytes(&self) -> &[u8; 2 * KEY_HALF_LEN] {
        &self.0
    }
}

impl From<[u8; 2 * KEY_HALF_LEN]> for SharedKey {
    fn from(key: [u8; 2 * KEY_HALF_LEN]) -> Self {
        Self(key)
    }
}

impl fmt::Debug for SharedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedKey").field(&"<redacted>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FACTORY_KEY1, FACTORY_KEY2};
    use hex_literal::hex;

    #[test]
    fn test_factory_default() {
        let key = SharedKey::factory_default();
        assert_eq!(key.as_bytes(), &hex!("49454D4B41455242214E4143554F5946"));
        assert!(key.is_factory_default());
        assert_eq!(
            SharedKey::from_hex(FACTORY_KEY1, FACTORY_KEY2).unwrap(),
            key
        );
    }

    #[test]
    fn test_expand() {
        let key = SharedKey::from_hex("0001020304050607", "08090a0b0c0d0e0f").unwrap();
        assert_eq!(
            *key.expand(),
            hex!("000102030405060708090a0b0c0d0e0f 0001020304050607")
        );
    }

    #[test]
    fn test_from_halves() {
        let key = SharedKey::from_halves([0x11; 8], [0x22; 8]);
        assert_eq!(&key.as_bytes()[..8], &[0x11; 8]);
        assert_eq!(&key.as_bytes()[8..], &[0x22; 8]);
        assert!(!key.is_factory_default());
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(matches!(
            SharedKey::from_hex("4945", FACTORY_KEY2),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            SharedKey::from_hex(FACTORY_KEY1, "ZZ4E4143554F5946"),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", SharedKey::factory_default());
        assert_eq!(rendered, "SharedKey(\"<redacted>\")");
    }
}
