//! Commands acting on the card as a whole

use std::error::Error;

use tracing::info;

use super::{CardSession, dump_command};
use crate::utils::display;

/// Block written and read back by the demo
const DEMO_BLOCK: u8 = 0x20;
const DEMO_DATA: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

/// Run mutual authentication and report the outcome
pub fn auth_command(session: &mut CardSession) -> Result<(), Box<dyn Error>> {
    session.authenticate()?;
    println!("{}", display::success("Authenticated"));
    Ok(())
}

/// Authenticate, write a block, read it back and dump the card
pub fn demo_command(session: &mut CardSession) -> Result<(), Box<dyn Error>> {
    auth_command(session)?;

    info!("Writing demo block");
    let mut memory = session.memory()?;
    memory.write_block(DEMO_BLOCK, &DEMO_DATA)?;

    let read_back = memory.read_block(DEMO_BLOCK)?;
    println!("{}", display::block_line(DEMO_BLOCK, &read_back));
    if read_back == DEMO_DATA {
        println!("{}", display::success("Block read back matches"));
    } else {
        println!("{}", display::warning("Block read back differs from data written"));
    }

    dump_command(session)
}
