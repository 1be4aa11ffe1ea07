//! Block-level memory access
//!
//! Reads and writes go straight through the framer. Protected blocks are
//! enforced by the card, which answers an unauthenticated access with an
//! error status surfaced as [`Error::Transport`].

use std::ops::Range;

use tracing::debug;
use ultralight_apdu_core::CardTransport;

use crate::{
    Error, Result,
    constants::{
        ins,
        memory::{BLOCK_SIZE, LAST_BLOCK, READABLE_END},
    },
    transparent::TransparentFramer,
};

/// Contents of one 4-byte memory block
pub type Block = [u8; BLOCK_SIZE];

/// Read/write accessor borrowing a framer
#[derive(Debug)]
pub struct Memory<'a, T: CardTransport> {
    framer: &'a mut TransparentFramer<T>,
}

impl<'a, T: CardTransport> Memory<'a, T> {
    pub(crate) const fn new(framer: &'a mut TransparentFramer<T>) -> Self {
        Self { framer }
    }

    /// Read one block
    ///
    /// The card always answers READ with four consecutive blocks; only the
    /// first is returned.
    pub fn read_block(&mut self, addr: u8) -> Result<Block> {
        read_block(self.framer, addr)
    }

    /// Write one block
    pub fn write_block(&mut self, addr: u8, data: &Block) -> Result<()> {
        check_address(addr)?;
        debug!(addr = format_args!("{addr:#04X}"), data = %hex::encode_upper(data), "Writing block");

        let mut command = Vec::with_capacity(2 + BLOCK_SIZE);
        command.extend_from_slice(&[ins::WRITE, addr]);
        command.extend_from_slice(data);

        // Success is signalled by the status word alone
        self.framer.send(&command)?;
        Ok(())
    }

    /// Write one block and read it back
    pub fn write_block_verified(&mut self, addr: u8, data: &Block) -> Result<()> {
        self.write_block(addr, data)?;
        if self.read_block(addr)? != *data {
            return Err(Error::MalformedResponse("block read back differs from data written"));
        }
        Ok(())
    }

    /// Lazily read every readable block in ascending order
    ///
    /// Each call starts a fresh pass over the card.
    pub fn dump(&mut self) -> Dump<'_, T> {
        Dump {
            framer: &mut *self.framer,
            addresses: 0..READABLE_END,
        }
    }
}

/// Iterator over `(address, block)` pairs, see [`Memory::dump`]
#[derive(Debug)]
pub struct Dump<'a, T: CardTransport> {
    framer: &'a mut TransparentFramer<T>,
    addresses: Range<u8>,
}

impl<T: CardTransport> Iterator for Dump<'_, T> {
    type Item = Result<(u8, Block)>;

    fn next(&mut self) -> Option<Self::Item> {
        let addr = self.addresses.next()?;
        Some(read_block(self.framer, addr).map(|block| (addr, block)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.addresses.size_hint()
    }
}

impl<T: CardTransport> ExactSizeIterator for Dump<'_, T> {}

/// Parse a block from exactly four bytes
pub fn block_from_slice(data: &[u8]) -> Result<Block> {
    data.try_into().map_err(|_| Error::InvalidLength {
        expected: BLOCK_SIZE,
        actual: data.len(),
    })
}

fn read_block<T: CardTransport>(framer: &mut TransparentFramer<T>, addr: u8) -> Result<Block> {
    check_address(addr)?;

    let answer = framer.send(&[ins::READ, addr])?;
    let block = answer
        .get(..BLOCK_SIZE)
        .ok_or(Error::MalformedResponse("READ answer shorter than one block"))?;

    block_from_slice(block)
}

fn check_address(addr: u8) -> Result<()> {
    if addr > LAST_BLOCK {
        return Err(Error::InvalidAddress(addr));
    }
    Ok(())
}
