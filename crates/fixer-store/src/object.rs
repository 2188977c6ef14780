//! [`RecordStore`] over the `object_store` crate.
//!
//! S3 key prefixes are plain string prefixes while `object_store` lists by
//! path segment, so [`ObjectStoreRecords::list`] lists the deepest directory
//! named by the prefix and filters the keys by the full prefix string.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use tracing::{debug, warn};

use crate::{Listing, RecordStore, StoreError};

/// Production [`RecordStore`] backed by an [`ObjectStore`].
pub struct ObjectStoreRecords {
    store: Arc<dyn ObjectStore>,
    /// Maximum keys taken from one listing; `None` lists everything.
    max_keys: Option<usize>,
}

impl ObjectStoreRecords {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            max_keys: None,
        }
    }

    /// Amazon S3 bucket, with credentials taken from the environment.
    pub fn s3(bucket: &str, region: &str) -> Result<Self, StoreError> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region)
            .build()?;
        Ok(Self::new(Arc::new(store)))
    }

    /// A local directory standing in for a bucket. The directory must exist.
    pub fn local(root: impl AsRef<std::path::Path>) -> Result<Self, StoreError> {
        let store = LocalFileSystem::new_with_prefix(root)?;
        Ok(Self::new(Arc::new(store)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()))
    }

    /// Cap the number of keys one [`list`](RecordStore::list) call returns.
    /// Hitting the cap is reported through [`Listing::truncated`].
    #[must_use]
    pub fn with_max_keys(mut self, max_keys: Option<usize>) -> Self {
        self.max_keys = max_keys;
        self
    }
}

fn parse_path(key: &str) -> Result<Path, StoreError> {
    Path::parse(key).map_err(|source| StoreError::InvalidKey {
        key: key.to_string(),
        source,
    })
}

#[async_trait]
impl RecordStore for ObjectStoreRecords {
    async fn list(&self, prefix: &str) -> Result<Listing, StoreError> {
        let dir = match prefix.rsplit_once('/') {
            Some((dir, _)) if !dir.is_empty() => Some(parse_path(dir)?),
            _ => None,
        };

        let mut keys = Vec::new();
        let mut truncated = false;
        let mut stream = self.store.list(dir.as_ref());
        while let Some(meta) = stream.next().await {
            let key = meta?.location.to_string();
            if !key.starts_with(prefix) {
                continue;
            }
            if self.max_keys.is_some_and(|max| keys.len() >= max) {
                truncated = true;
                break;
            }
            keys.push(key);
        }
        keys.sort_unstable();

        if truncated {
            warn!(
                prefix = %prefix,
                max_keys = ?self.max_keys,
                "listing truncated at max_keys; remaining keys were not listed"
            );
        }
        debug!(prefix = %prefix, count = keys.len(), "listed records");

        Ok(Listing { keys, truncated })
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        let path = parse_path(key)?;
        let body = self.store.get(&path).await?.bytes().await?;
        Ok(body)
    }

    async fn put(&self, key: &str, body: Bytes) -> Result<(), StoreError> {
        let path = parse_path(key)?;
        self.store.put(&path, PutPayload::from_bytes(body)).await?;
        Ok(())
    }
}
