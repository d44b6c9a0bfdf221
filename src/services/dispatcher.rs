use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    domain::value_objects::ObjectKey,
    ports::storage::{DeleteOutcome, ObjectStore},
};

/// What a dispatch did with the keys it was handed
#[derive(Debug)]
pub enum Dispatch {
    /// Dry-run: nothing was deleted, these keys would have been
    DryRun(Vec<ObjectKey>),
    /// Delete calls were issued; one outcome per key
    Executed(Vec<DeleteOutcome>),
}

/// Sends expired keys to the store, or only logs them in dry-run mode
#[derive(Clone)]
pub struct DeletionDispatcher {
    store: Arc<dyn ObjectStore>,
    dry_run: bool,
}

impl DeletionDispatcher {
    pub fn new(store: Arc<dyn ObjectStore>, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    pub async fn dispatch(&self, keys: Vec<ObjectKey>) -> Dispatch {
        if keys.is_empty() {
            return Dispatch::Executed(Vec::new());
        }

        if self.dry_run {
            info!("[Dry Run] Would delete: {:?}", display_keys(&keys));
            return Dispatch::DryRun(keys);
        }

        let outcomes = self.store.delete_objects(&keys).await;
        for outcome in &outcomes {
            match &outcome.result {
                Ok(()) => info!("Deleted object: {}", outcome.key),
                Err(e) => warn!(class = %e.class(), "Failed to delete {}: {}", outcome.key, e),
            }
        }

        Dispatch::Executed(outcomes)
    }
}

fn display_keys(keys: &[ObjectKey]) -> Vec<&str> {
    keys.iter().map(ObjectKey::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{StorageError, StorageResult};
    use crate::ports::storage::Listing;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingStore {
        delete_calls: AtomicUsize,
    }

    #[async_trait]
    impl ObjectStore for CountingStore {
        async fn list_level(&self, _prefix: &str) -> StorageResult<Listing> {
            Ok(Listing::default())
        }

        async fn delete_objects(&self, keys: &[ObjectKey]) -> Vec<DeleteOutcome> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            keys.iter()
                .map(|key| DeleteOutcome {
                    key: key.clone(),
                    result: if key.as_str().ends_with(".locked") {
                        Err(StorageError::AccessDenied {
                            operation: "delete object".to_string(),
                            message: "locked".to_string(),
                        })
                    } else {
                        Ok(())
                    },
                })
                .collect()
        }
    }

    fn keys(names: &[&str]) -> Vec<ObjectKey> {
        names
            .iter()
            .map(|n| ObjectKey::new(n.to_string()).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_dry_run_never_calls_store() {
        let store = Arc::new(CountingStore::default());
        let dispatcher = DeletionDispatcher::new(store.clone(), true);

        match dispatcher.dispatch(keys(&["a/1", "a/2"])).await {
            Dispatch::DryRun(would_delete) => assert_eq!(would_delete, keys(&["a/1", "a/2"])),
            other => panic!("expected dry run, got {other:?}"),
        }
        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_executes_and_reports_per_key() {
        let store = Arc::new(CountingStore::default());
        let dispatcher = DeletionDispatcher::new(store.clone(), false);

        let Dispatch::Executed(outcomes) = dispatcher.dispatch(keys(&["a/1", "a/2.locked"])).await
        else {
            panic!("expected executed dispatch");
        };

        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
        assert!(outcomes[0].is_deleted());
        assert!(!outcomes[1].is_deleted());
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let store = Arc::new(CountingStore::default());
        let dispatcher = DeletionDispatcher::new(store.clone(), false);

        assert!(matches!(
            dispatcher.dispatch(Vec::new()).await,
            Dispatch::Executed(ref o) if o.is_empty()
        ));
        assert_eq!(store.delete_calls.load(Ordering::SeqCst), 0);
    }
}
