//! fixer-store: object storage access for s3-format-fixer.
//!
//! The batch driver talks to storage only through the [`RecordStore`] trait:
//! list the keys under a prefix, fetch one record, write one record back.
//! [`ObjectStoreRecords`] implements it over any `object_store` backend
//! (Amazon S3 in production, a local directory or memory in tests).

pub mod object;

pub use object::ObjectStoreRecords;

use async_trait::async_trait;
use bytes::Bytes;

/// Errors from record storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Object store I/O error.
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// A key or prefix that is not a valid object path.
    #[error("invalid object key {key:?}: {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: object_store::path::Error,
    },
}

/// Keys returned by [`RecordStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Matching keys in lexicographic order.
    pub keys: Vec<String>,
    /// More keys matched than the store's listing cap allowed.
    pub truncated: bool,
}

/// Storage collaborator for the batch driver.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List keys that start with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Listing, StoreError>;

    /// Fetch the bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Bytes, StoreError>;

    /// Replace the bytes stored under `key`.
    async fn put(&self, key: &str, body: Bytes) -> Result<(), StoreError>;
}
