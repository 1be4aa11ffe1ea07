//! Core traits and types for raw APDU exchanges with a card reader
//!
//! This crate provides the small set of building blocks that sit below any
//! card-specific protocol:
//!
//! - [`StatusWord`] for interpreting the two trailing status bytes of a reader response
//! - [`Response`] for splitting a raw response into payload and status word
//! - [`CardTransport`] for byte-in/byte-out communication with a reader
//!
//! Nothing in here knows about reader envelopes or card command sets; those
//! live in the crates layered on top.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::Bytes;

pub mod response;
pub mod transport;

pub use response::error::{ResponseError, StatusError};
pub use response::status::StatusWord;
pub use response::Response;
pub use transport::{CardTransport, TransportError};
