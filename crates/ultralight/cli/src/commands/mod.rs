//! Command handlers

mod card_operations;
mod memory_operations;

pub use card_operations::*;
pub use memory_operations::*;

use ultralight_apdu_transport_pcsc::PcscTransport;
use ultralight_c::Session;

/// Session over a PC/SC reader
pub type CardSession = Session<PcscTransport>;
