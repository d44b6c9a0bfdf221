//! Recursive listing over a delimiter-based object store.

use futures::stream::{self, BoxStream, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::info;

use crate::{
    domain::errors::StorageResult,
    ports::storage::{ObjectInfo, ObjectStore},
};

struct WalkState {
    store: Arc<dyn ObjectStore>,
    // Prefixes still to list, top of the stack is listed next
    pending: Vec<String>,
    // Objects from the last listed level not yet handed out
    ready: VecDeque<ObjectInfo>,
    // String prefix the first listed level is filtered by
    root_filter: Option<String>,
    failed: bool,
}

/// Split a raw string prefix into the delimiter level that holds its matches
/// and the filter applied to that level. `nightly/run` lists `nightly` and
/// keeps entries starting with `nightly/run`.
fn split_prefix(prefix: &str) -> (String, Option<String>) {
    if prefix.is_empty() {
        return (String::new(), None);
    }

    let level = match prefix.rfind('/') {
        Some(idx) => prefix[..idx].trim_end_matches('/'),
        None => "",
    };
    (level.to_string(), Some(prefix.to_string()))
}

/// Lazily list every object whose key starts with `prefix`, descending into
/// each sub-prefix.
///
/// `prefix` is a plain string prefix and may end mid-segment. Levels are
/// listed one at a time off an explicit stack, depth-first in discovery
/// order. A listing error is yielded once and ends the stream.
pub fn list_recursive(
    store: Arc<dyn ObjectStore>,
    prefix: impl Into<String>,
) -> BoxStream<'static, StorageResult<ObjectInfo>> {
    let (level, root_filter) = split_prefix(&prefix.into());
    let state = WalkState {
        store,
        pending: vec![level],
        ready: VecDeque::new(),
        root_filter,
        failed: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(object) = state.ready.pop_front() {
                return Some((Ok(object), state));
            }

            if state.failed {
                return None;
            }

            let prefix = state.pending.pop()?;
            match state.store.list_level(&prefix).await {
                Ok(listing) => {
                    let filter = state.root_filter.take();
                    let matches =
                        |path: &str| filter.as_deref().map_or(true, |f| path.starts_with(f));

                    for object in listing.objects {
                        if !matches(object.key.as_str()) {
                            continue;
                        }
                        info!(
                            "Found object: {} with last modified: {}",
                            object.key, object.last_modified
                        );
                        state.ready.push_back(object);
                    }

                    // Reverse so the first discovered sub-prefix is listed first
                    for sub_prefix in listing.sub_prefixes.into_iter().rev() {
                        if !matches(&sub_prefix) {
                            continue;
                        }
                        info!("Traversing into subdir: {}", sub_prefix);
                        state.pending.push(sub_prefix);
                    }
                }
                Err(e) => {
                    state.failed = true;
                    return Some((Err(e), state));
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::storage::ApacheObjectStoreAdapter;
    use crate::domain::errors::StorageError;
    use crate::ports::storage::{DeleteOutcome, Listing};
    use crate::domain::value_objects::ObjectKey;
    use async_trait::async_trait;
    use object_store::{ObjectStore as _, PutPayload, memory::InMemory, path::Path};

    async fn adapter_with(keys: &[&str]) -> Arc<dyn ObjectStore> {
        let store = Arc::new(InMemory::new());
        for key in keys {
            store
                .put(&Path::from(*key), PutPayload::from_static(b"x"))
                .await
                .unwrap();
        }
        Arc::new(ApacheObjectStoreAdapter::new(store))
    }

    async fn collect_keys(store: Arc<dyn ObjectStore>, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = list_recursive(store, prefix)
            .map(|item| item.unwrap().key.as_str().to_string())
            .collect()
            .await;
        keys.sort();
        keys
    }

    #[tokio::test]
    async fn test_walks_every_level() {
        let store = adapter_with(&[
            "ci/top.txt",
            "ci/run1/out.bin",
            "ci/run1/test_data/a.bin",
            "ci/run1/test_data/deep/b.bin",
            "ci/run2/log.txt",
            "other/ignored.txt",
        ])
        .await;

        let keys = collect_keys(store, "ci").await;
        assert_eq!(
            keys,
            vec![
                "ci/run1/out.bin",
                "ci/run1/test_data/a.bin",
                "ci/run1/test_data/deep/b.bin",
                "ci/run2/log.txt",
                "ci/top.txt",
            ]
        );
    }

    #[tokio::test]
    async fn test_prefix_may_end_mid_segment() {
        let store = adapter_with(&[
            "nightly/run1/test_data/a.bin",
            "nightly/run2/b.bin",
            "nightly/runner.log",
            "nightly/other/c.bin",
            "nightly-old/run1/d.bin",
        ])
        .await;

        assert_eq!(
            collect_keys(store.clone(), "nightly/run").await,
            vec![
                "nightly/run1/test_data/a.bin",
                "nightly/run2/b.bin",
                "nightly/runner.log",
            ]
        );
        assert_eq!(
            collect_keys(store.clone(), "nightly").await.len(),
            5
        );
        assert_eq!(
            collect_keys(store, "nightly/").await,
            vec![
                "nightly/other/c.bin",
                "nightly/run1/test_data/a.bin",
                "nightly/run2/b.bin",
                "nightly/runner.log",
            ]
        );
    }

    #[test]
    fn test_split_prefix() {
        assert_eq!(split_prefix(""), (String::new(), None));
        assert_eq!(
            split_prefix("nightly"),
            (String::new(), Some("nightly".to_string()))
        );
        assert_eq!(
            split_prefix("nightly/run"),
            ("nightly".to_string(), Some("nightly/run".to_string()))
        );
        assert_eq!(
            split_prefix("nightly/run1/"),
            ("nightly/run1".to_string(), Some("nightly/run1/".to_string()))
        );
    }

    #[tokio::test]
    async fn test_root_prefix_and_empty_store() {
        let store = adapter_with(&["a.txt", "x/y/z.txt"]).await;
        assert_eq!(collect_keys(store, "").await, vec!["a.txt", "x/y/z.txt"]);

        let empty = adapter_with(&[]).await;
        assert!(collect_keys(empty, "anything").await.is_empty());
    }

    #[tokio::test]
    async fn test_deep_nesting_does_not_recurse() {
        let deep: String = (0..200).map(|i| format!("d{}/", i)).collect::<String>() + "leaf.txt";
        let store = adapter_with(&[deep.as_str()]).await;
        assert_eq!(collect_keys(store, "").await, vec![deep]);
    }

    struct BrokenStore;

    #[async_trait]
    impl ObjectStore for BrokenStore {
        async fn list_level(&self, prefix: &str) -> StorageResult<Listing> {
            if prefix.is_empty() {
                Ok(Listing {
                    objects: Vec::new(),
                    sub_prefixes: vec!["a".to_string(), "b".to_string()],
                })
            } else {
                Err(StorageError::AccessDenied {
                    operation: "list objects".to_string(),
                    message: format!("no access to {}", prefix),
                })
            }
        }

        async fn delete_objects(&self, _keys: &[ObjectKey]) -> Vec<DeleteOutcome> {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn test_listing_error_ends_stream() {
        let items: Vec<_> = list_recursive(Arc::new(BrokenStore), "").collect().await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(StorageError::AccessDenied { .. })));
    }
}
