//! MIFARE Ultralight-C mutual authentication and block access
//!
//! This crate talks to an Ultralight-C (MF0ICU2) through a reader that
//! relays card commands inside a transparent exchange envelope, such as the
//! ACS ACR1552U. It is split along the layers of the protocol:
//!
//! - [`crypto`]: 2-key Triple-DES in CBC mode and nonce rotation
//! - [`transparent`]: wrapping card commands in the reader envelope and
//!   checking status words
//! - [`session`]: the mutual authentication state machine
//! - [`memory`]: reading, writing and dumping 4-byte blocks
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "pcsc")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//!
//! use ultralight_apdu_transport_pcsc::PcscDeviceManager;
//! use ultralight_c::{FramerConfig, Session, SharedKey, discovery};
//!
//! let manager = PcscDeviceManager::new()?;
//! let request = discovery::ultralight_c_request(Duration::from_secs(10));
//! let transport = discovery::connect(&manager, &request)?;
//!
//! let mut session = Session::open_new(transport, SharedKey::factory_default(), FramerConfig::default())?;
//! session.authenticate()?;
//!
//! let mut memory = session.memory()?;
//! memory.write_block(0x20, &[0xDE, 0xAD, 0xBE, 0xEF])?;
//! for entry in memory.dump() {
//!     let (addr, block) = entry?;
//!     println!("{addr:#04X}: {}", hex::encode_upper(block));
//! }
//! drop(memory);
//!
//! session.close()?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "pcsc"))]
//! # fn main() {}
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

pub mod constants;
pub mod crypto;
#[cfg(feature = "pcsc")]
pub mod discovery;
mod error;
pub mod keys;
pub mod memory;
pub mod session;
pub mod transparent;

pub use error::{Error, Result};
pub use keys::SharedKey;
pub use memory::{Block, Dump, Memory};
pub use session::{AuthState, Session};
pub use transparent::{FramerConfig, TransparentFramer};

// Re-export from ultralight_apdu_core for convenience
pub use ultralight_apdu_core::{CardTransport, StatusWord, TransportError};
