//! s3-format-fixer: repairs loosely-quoted SNS records stored in S3.
//!
//! The upstream publisher stored each notification as quasi-JSON: bare keys,
//! inconsistently quoted values, quoted numbers and an RFC3339 timestamp
//! where consumers expect epoch milliseconds. This crate lists the affected
//! objects, repairs each one and writes canonical JSON back in place.
//!
//! # Architecture
//!
//! ```text
//! RecordStore.list ──► RecordStore.get ──► fixer_core::repair ──► RecordStore.put
//!                                           (normalize → decode → encode)
//! ```
//!
//! The repair itself lives in `fixer-core`; storage access lives in
//! `fixer-store`. This crate owns only the [`batch`] driver and the binary.

pub mod batch;

pub use batch::{run, BatchOptions, BatchReport, RecordFailure, Stage};
pub use fixer_core::{EnvelopeCodec, EpochUnit};
pub use fixer_store::{ObjectStoreRecords, RecordStore};
