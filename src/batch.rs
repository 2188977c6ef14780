//! Batch driver: repairs every record under a prefix, in place.
//!
//! Each record runs as its own task on a [`JoinSet`], at most
//! [`BatchOptions::concurrency`] at once. A failure on one record is logged
//! and recorded in the [`BatchReport`]; it never stops the others. Malformed
//! records are not retried.

use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use fixer_core::{is_canonical, repair, EnvelopeCodec, RepairError};
use fixer_store::RecordStore;

/// Knobs for one batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub codec: EnvelopeCodec,
    /// Records in flight at once. Values below 1 are treated as 1.
    pub concurrency: usize,
    /// Repair and report, but never write back.
    pub dry_run: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            codec: EnvelopeCodec::default(),
            concurrency: 8,
            dry_run: false,
        }
    }
}

/// Where a record failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Fetch,
    Decode,
    Encode,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Decode => write!(f, "decode"),
            Stage::Encode => write!(f, "encode"),
            Stage::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub key: String,
    pub stage: Stage,
    pub error: String,
}

/// Summary of a batch run, printed as JSON by the binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Keys returned by the listing.
    pub listed: usize,
    /// Records repaired (and written, unless `dry_run`).
    pub fixed: usize,
    /// Records already in canonical form.
    pub skipped: usize,
    pub failed: Vec<RecordFailure>,
    /// The listing hit the store's key cap.
    pub truncated: bool,
    pub dry_run: bool,
}

enum Outcome {
    Fixed,
    Skipped,
    Failed(RecordFailure),
}

/// Repair every record under `prefix`.
///
/// # Errors
///
/// A failed listing or a panicked record task aborts the run. Per-record
/// failures are reported in [`BatchReport::failed`].
pub async fn run(
    store: Arc<dyn RecordStore>,
    prefix: &str,
    options: &BatchOptions,
) -> anyhow::Result<BatchReport> {
    let listing = store
        .list(prefix)
        .await
        .with_context(|| format!("unable to list records under prefix {prefix:?}"))?;

    info!(
        prefix = %prefix,
        records = listing.keys.len(),
        dry_run = options.dry_run,
        timestamp_unit = %options.codec.unit(),
        "starting batch"
    );
    if listing.truncated {
        warn!(prefix = %prefix, "listing was truncated; re-run to reach the remaining records");
    }

    let mut report = BatchReport {
        listed: listing.keys.len(),
        truncated: listing.truncated,
        dry_run: options.dry_run,
        ..BatchReport::default()
    };

    let max_in_flight = options.concurrency.max(1);
    let mut join_set = JoinSet::new();
    for key in listing.keys {
        if join_set.len() >= max_in_flight {
            if let Some(outcome) = join_set.join_next().await {
                report.record(outcome.context("record task panicked")?);
            }
        }
        let store = Arc::clone(&store);
        let codec = options.codec;
        let dry_run = options.dry_run;
        join_set.spawn(async move { process_record(store.as_ref(), &key, codec, dry_run).await });
    }
    while let Some(outcome) = join_set.join_next().await {
        report.record(outcome.context("record task panicked")?);
    }
    report.failed.sort_by(|a, b| a.key.cmp(&b.key));

    info!(
        fixed = report.fixed,
        skipped = report.skipped,
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

impl BatchReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Fixed => self.fixed += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(failure) => self.failed.push(failure),
        }
    }
}

async fn process_record(store: &dyn RecordStore, key: &str, codec: EnvelopeCodec, dry_run: bool) -> Outcome {
    let raw = match store.get(key).await {
        Ok(raw) => raw,
        Err(err) => return failed(key, Stage::Fetch, err),
    };

    if is_canonical(&raw) {
        debug!(key = %key, "already canonical, skipping");
        return Outcome::Skipped;
    }

    let repaired = match repair(&raw, &codec) {
        Ok(repaired) => repaired,
        Err(err @ RepairError::Decode(_)) => return failed(key, Stage::Decode, err),
        Err(err @ RepairError::Encode(_)) => return failed(key, Stage::Encode, err),
    };

    if dry_run {
        debug!(key = %key, "dry run, not writing");
        return Outcome::Fixed;
    }

    if let Err(err) = store.put(key, Bytes::from(repaired.bytes)).await {
        return failed(key, Stage::Write, err);
    }
    debug!(key = %key, "record rewritten");
    Outcome::Fixed
}

fn failed(key: &str, stage: Stage, err: impl std::fmt::Display) -> Outcome {
    let error = err.to_string();
    warn!(key = %key, stage = %stage, error = %error, "record failed");
    Outcome::Failed(RecordFailure {
        key: key.to_string(),
        stage,
        error,
    })
}
