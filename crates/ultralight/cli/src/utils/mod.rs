//! Utility functions for the Ultralight-C CLI

pub mod display;
pub mod reader;

use ultralight_c::{constants::memory::LAST_BLOCK, memory::Block};

/// Parse a block address given in hex (`0x20`) or decimal (`32`)
pub fn parse_block_address(s: &str) -> Result<u8, String> {
    let addr = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(digits) => u8::from_str_radix(digits, 16),
        None => s.parse::<u8>(),
    }
    .map_err(|e| format!("invalid block address '{s}': {e}"))?;

    if addr > LAST_BLOCK {
        return Err(format!(
            "block address {addr:#04X} is beyond the last block {LAST_BLOCK:#04X}"
        ));
    }
    Ok(addr)
}

/// Parse four bytes of block data from 8 hex digits
pub fn parse_block_data(s: &str) -> Result<Block, String> {
    let mut block = Block::default();
    hex::decode_to_slice(s, &mut block)
        .map_err(|e| format!("block data must be 8 hex digits: {e}"))?;
    Ok(block)
}
