use async_trait::async_trait;

use crate::domain::{errors::ComputeResult, models::InstanceSweepReport, value_objects::FolderId};

/// Service port for the instance TTL sweep
#[async_trait]
pub trait InstanceSweepService: Send + Sync + 'static {
    /// List the folder's instances and delete those past the TTL, or only
    /// report them when not applying.
    async fn sweep(&self, folder: &FolderId) -> ComputeResult<InstanceSweepReport>;
}
