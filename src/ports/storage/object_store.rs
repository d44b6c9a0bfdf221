use crate::domain::{
    errors::{StorageError, StorageResult},
    value_objects::ObjectKey,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Port for the object storage operations a sweep needs.
/// This abstracts the actual storage backend (S3, in-memory, etc.)
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// List one directory level under `prefix` ("" is the bucket root).
    /// Pagination is the adapter's concern; the listing is complete.
    async fn list_level(&self, prefix: &str) -> StorageResult<Listing>;

    /// Delete the given keys, reporting a result per key.
    /// A key that no longer exists counts as deleted.
    async fn delete_objects(&self, keys: &[ObjectKey]) -> Vec<DeleteOutcome>;
}

/// Information about an object in storage
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub key: ObjectKey,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// One level of a delimiter listing
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub objects: Vec<ObjectInfo>,
    pub sub_prefixes: Vec<String>,
}

/// Result of deleting a single key
#[derive(Debug, Clone)]
pub struct DeleteOutcome {
    pub key: ObjectKey,
    pub result: Result<(), StorageError>,
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        self.result.is_ok()
    }
}
