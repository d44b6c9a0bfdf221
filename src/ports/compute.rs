use async_trait::async_trait;

use crate::domain::{
    errors::ComputeResult,
    models::Instance,
    value_objects::{FolderId, InstanceId},
};

/// Port for the compute provider's instance API
#[async_trait]
pub trait ComputeClient: Send + Sync + 'static {
    /// List every instance in the folder, following pagination
    async fn list_instances(&self, folder: &FolderId) -> ComputeResult<Vec<Instance>>;

    /// Delete an instance. Deleting an instance that is already gone succeeds.
    async fn delete_instance(&self, id: &InstanceId) -> ComputeResult<()>;
}
