//! fixer-core: repairs quasi-JSON SNS notification records.
//!
//! This crate holds the two pure stages of the repair pipeline plus the
//! types, errors and configuration they share.
//!
//! # Architecture
//!
//! ```text
//! raw bytes ──► Normalizer ──► strict JSON text ──► Codec.decode ──► Envelope
//!                                                                      │
//!                              canonical JSON bytes ◄── Codec.encode ◄─┘
//! ```
//!
//! Neither stage performs I/O or keeps state between calls, so both are safe
//! to run concurrently on independent records. Fetching and storing the
//! bytes is the job of `fixer-store` and the batch driver.

pub mod codec;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod types;

pub use codec::{decode, encode, is_canonical, EnvelopeCodec};
pub use error::{DecodeError, DecodeErrorKind, EncodeError, RepairError};
pub use normalizer::normalize;
pub use pipeline::{repair, Repaired};
pub use types::{AttributePlaceholder, Envelope, EpochUnit, Notification, Timestamp};
