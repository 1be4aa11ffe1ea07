//! Cryptographic primitives for the Ultralight-C handshake
//!
//! Plain 2-key Triple-DES in CBC mode with no padding, over an explicit key
//! and IV. Every handshake message is one or two 8-byte blocks, so inputs
//! that are not block aligned are rejected rather than padded.

use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, generic_array::GenericArray};
use des::TdesEde3;

use crate::{Error, Result};

type Encryptor = cbc::Encryptor<TdesEde3>;
type Decryptor = cbc::Decryptor<TdesEde3>;
type Block = cipher::Block<TdesEde3>;

/// DES block size in bytes
pub const BLOCK_SIZE: usize = 8;

/// Three-key form of a 2-key Triple-DES key (K1 || K2 || K1)
pub type ExpandedKey = [u8; 24];
/// CBC initialization vector
pub type Iv = [u8; BLOCK_SIZE];
/// Handshake nonce (RndA or RndB)
pub type Nonce = [u8; BLOCK_SIZE];

/// IV of the first message of every handshake
pub const ZERO_IV: Iv = [0; BLOCK_SIZE];

/// Encrypt `data` with Triple-DES in CBC mode
///
/// # Errors
///
/// [`Error::InvalidLength`] if `data` is not a multiple of [`BLOCK_SIZE`].
pub fn encrypt(key: &ExpandedKey, iv: &Iv, data: &[u8]) -> Result<Vec<u8>> {
    let mut blocks = to_blocks(data)?;
    Encryptor::new(GenericArray::from_slice(key), GenericArray::from_slice(iv))
        .encrypt_blocks_mut(&mut blocks);
    Ok(from_blocks(&blocks))
}

/// Decrypt `data` with Triple-DES in CBC mode
///
/// # Errors
///
/// [`Error::InvalidLength`] if `data` is not a multiple of [`BLOCK_SIZE`].
pub fn decrypt(key: &ExpandedKey, iv: &Iv, data: &[u8]) -> Result<Vec<u8>> {
    let mut blocks = to_blocks(data)?;
    Decryptor::new(GenericArray::from_slice(key), GenericArray::from_slice(iv))
        .decrypt_blocks_mut(&mut blocks);
    Ok(from_blocks(&blocks))
}

/// Rotate a nonce left by one byte
pub fn rotate_left(nonce: &Nonce) -> Nonce {
    let mut rotated = *nonce;
    rotated.rotate_left(1);
    rotated
}

fn to_blocks(data: &[u8]) -> Result<Vec<Block>> {
    if data.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidLength {
            expected: data.len().next_multiple_of(BLOCK_SIZE),
            actual: data.len(),
        });
    }

    Ok(data
        .chunks_exact(BLOCK_SIZE)
        .map(GenericArray::clone_from_slice)
        .collect())
}

fn from_blocks(blocks: &[Block]) -> Vec<u8> {
    blocks.iter().flat_map(|block| block.iter().copied()).collect()
}
