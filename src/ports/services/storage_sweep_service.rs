use async_trait::async_trait;

use crate::domain::{errors::StorageResult, models::StorageSweepReport};

/// Service port for the storage TTL sweep
#[async_trait]
pub trait StorageSweepService: Send + Sync + 'static {
    /// Walk everything under `prefix`, delete expired objects (or log them in
    /// dry-run) and wait for every in-flight deletion before returning.
    ///
    /// Fails when the listing itself fails; per-object delete failures are
    /// reported in the result instead.
    async fn sweep(&self, prefix: &str) -> StorageResult<StorageSweepReport>;
}
