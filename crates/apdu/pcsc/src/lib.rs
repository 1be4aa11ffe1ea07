//! PC/SC transport implementation for raw APDU exchanges
//!
//! This crate provides an implementation of the `CardTransport` trait from
//! `ultralight-apdu-core` on top of the PC/SC API, plus the card discovery
//! needed before any protocol traffic: enumerating readers and waiting,
//! with a timeout, for a card whose ATR matches an expected signature.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::time::Duration;
//!
//! use ultralight_apdu_core::CardTransport;
//! use ultralight_apdu_transport_pcsc::{AtrPattern, CardRequest, PcscConfig, PcscDeviceManager};
//!
//! let manager = PcscDeviceManager::new()?;
//! let request = CardRequest::new(AtrPattern::exact(vec![0x3B, 0x80, 0x80, 0x01, 0x01]))
//!     .with_timeout(Duration::from_secs(5));
//!
//! let mut transport = manager.wait_for_card(&request, PcscConfig::default())?;
//! let response = transport.transmit_raw(&[0xFF, 0xCA, 0x00, 0x00, 0x00])?;
//! println!("UID response: {}", hex::encode_upper(&response));
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![warn(missing_docs)]

mod config;
mod error;
mod manager;
mod reader;
mod transport;

pub use config::{AtrPattern, CardRequest, PcscConfig, ShareMode};
pub use error::PcscError;
pub use manager::PcscDeviceManager;
pub use reader::PcscReader;
pub use transport::PcscTransport;
