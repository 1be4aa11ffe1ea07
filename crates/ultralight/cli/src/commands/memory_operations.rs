//! Commands for reading and writing blocks

use std::error::Error;

use tracing::debug;

use super::CardSession;
use crate::utils::display;

/// Authenticate unless the session already is
fn ensure_authenticated(session: &mut CardSession) -> Result<(), Box<dyn Error>> {
    if !session.is_authenticated() {
        debug!("Authenticating before block access");
        session.authenticate()?;
    }
    Ok(())
}

/// Read and print one block
pub fn read_command(session: &mut CardSession, addr: u8) -> Result<(), Box<dyn Error>> {
    ensure_authenticated(session)?;

    let block = session.memory()?.read_block(addr)?;
    println!("{}", display::block_line(addr, &block));
    Ok(())
}

/// Write one block and verify it by reading it back
pub fn write_command(
    session: &mut CardSession,
    addr: u8,
    data: &[u8; 4],
) -> Result<(), Box<dyn Error>> {
    ensure_authenticated(session)?;

    session.memory()?.write_block_verified(addr, data)?;
    println!("{}", display::success(&format!("Wrote block {addr:#04X}")));
    Ok(())
}

/// Print every readable block
pub fn dump_command(session: &mut CardSession) -> Result<(), Box<dyn Error>> {
    ensure_authenticated(session)?;

    println!("{}", display::section_title("Memory dump"));
    for entry in session.memory()?.dump() {
        let (addr, block) = entry?;
        println!("{}", display::block_line(addr, &block));
    }
    Ok(())
}
