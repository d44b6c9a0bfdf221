use async_trait::async_trait;
use object_store::{ObjectStore as ApacheObjectStore, path::Path as ObjectPath};
use std::sync::Arc;
use tracing::debug;

use super::error::map_store_error;
use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::ObjectKey,
    },
    ports::storage::{DeleteOutcome, Listing, ObjectInfo, ObjectStore},
};

/// Adapter that implements our ObjectStore trait using Apache object_store
#[derive(Clone)]
pub struct ApacheObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
}

impl ApacheObjectStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self { inner: store }
    }

    /// Keys and prefixes come back from listings already encoded, so parse
    /// them as-is and only fall back to encoding for hand-written input.
    fn to_object_path(raw: &str) -> ObjectPath {
        ObjectPath::parse(raw).unwrap_or_else(|_| ObjectPath::from(raw))
    }
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    async fn list_level(&self, prefix: &str) -> StorageResult<Listing> {
        let prefix_path = (!prefix.is_empty()).then(|| Self::to_object_path(prefix));

        let result = self
            .inner
            .list_with_delimiter(prefix_path.as_ref())
            .await
            .map_err(|e| map_store_error("list objects", e))?;

        let objects = result
            .objects
            .into_iter()
            .map(|meta| {
                let key = ObjectKey::new(meta.location.to_string()).map_err(|e| {
                    StorageError::ValidationError {
                        message: format!("Invalid object key from store: {}", e),
                    }
                })?;

                Ok(ObjectInfo {
                    key,
                    size: meta.size,
                    last_modified: meta.last_modified,
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        let sub_prefixes = result
            .common_prefixes
            .into_iter()
            .map(|path| path.to_string())
            .collect();

        Ok(Listing {
            objects,
            sub_prefixes,
        })
    }

    async fn delete_objects(&self, keys: &[ObjectKey]) -> Vec<DeleteOutcome> {
        let mut outcomes = Vec::with_capacity(keys.len());

        for key in keys {
            let path = Self::to_object_path(key.as_str());

            let result = match self.inner.delete(&path).await {
                Ok(()) => Ok(()),
                Err(object_store::Error::NotFound { .. }) => {
                    debug!(key = %key, "Object already gone");
                    Ok(())
                }
                Err(e) => Err(map_store_error("delete object", e)),
            };

            outcomes.push(DeleteOutcome {
                key: key.clone(),
                result,
            });
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::{PutPayload, memory::InMemory};

    async fn seeded_store(keys: &[&str]) -> Arc<InMemory> {
        let store = Arc::new(InMemory::new());
        for key in keys {
            store
                .put(&ObjectPath::from(*key), PutPayload::from_static(b"data"))
                .await
                .unwrap();
        }
        store
    }

    fn key(s: &str) -> ObjectKey {
        ObjectKey::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_list_level_splits_objects_and_prefixes() {
        let store = seeded_store(&["runs/a.txt", "runs/test_data/b.bin", "runs/logs/c.log"]).await;
        let adapter = ApacheObjectStoreAdapter::new(store);

        let listing = adapter.list_level("runs").await.unwrap();

        let keys: Vec<_> = listing.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["runs/a.txt"]);
        assert_eq!(listing.objects[0].size, 4);

        let mut prefixes = listing.sub_prefixes.clone();
        prefixes.sort();
        assert_eq!(prefixes, vec!["runs/logs", "runs/test_data"]);
    }

    #[tokio::test]
    async fn test_list_level_root_and_trailing_slash() {
        let store = seeded_store(&["top.txt", "dir/inner.txt"]).await;
        let adapter = ApacheObjectStoreAdapter::new(store);

        let root = adapter.list_level("").await.unwrap();
        assert_eq!(root.objects.len(), 1);
        assert_eq!(root.sub_prefixes, vec!["dir".to_string()]);

        let dir = adapter.list_level("dir/").await.unwrap();
        assert_eq!(dir.objects[0].key.as_str(), "dir/inner.txt");
    }

    #[tokio::test]
    async fn test_delete_objects_is_idempotent() {
        let store = seeded_store(&["a/one.txt", "a/two.txt"]).await;
        let adapter = ApacheObjectStoreAdapter::new(store.clone());

        let outcomes = adapter
            .delete_objects(&[key("a/one.txt"), key("a/missing.txt")])
            .await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(DeleteOutcome::is_deleted));

        let remaining = adapter.list_level("a").await.unwrap();
        let keys: Vec<_> = remaining.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["a/two.txt"]);

        // Second pass over the same key is still fine
        let again = adapter.delete_objects(&[key("a/one.txt")]).await;
        assert!(again[0].is_deleted());
    }
}
