use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{ComputeError, ComputeResult},
        models::Instance,
        value_objects::{FolderId, InstanceId},
    },
    ports::compute::ComputeClient,
};

/// In-memory implementation of ComputeClient for testing and development
#[derive(Clone, Default)]
pub struct InMemoryComputeClient {
    data: Arc<RwLock<ComputeData>>,
}

#[derive(Default)]
struct ComputeData {
    // Map of folder -> instances in listing order
    folders: HashMap<FolderId, Vec<Instance>>,
    // Every delete call received, in order
    delete_calls: Vec<InstanceId>,
    // Instances whose deletion should fail
    failing: HashMap<InstanceId, ComputeError>,
    // Folders whose listing should fail
    failing_folders: HashSet<FolderId>,
}

impl InMemoryComputeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_instance(&self, folder: &FolderId, instance: Instance) {
        let mut data = self.data.write().await;
        data.folders.entry(folder.clone()).or_default().push(instance);
    }

    pub async fn fail_delete(&self, id: &InstanceId, error: ComputeError) {
        let mut data = self.data.write().await;
        data.failing.insert(id.clone(), error);
    }

    pub async fn fail_listing(&self, folder: &FolderId) {
        let mut data = self.data.write().await;
        data.failing_folders.insert(folder.clone());
    }

    pub async fn delete_calls(&self) -> Vec<InstanceId> {
        self.data.read().await.delete_calls.clone()
    }

    pub async fn instance_ids(&self, folder: &FolderId) -> Vec<InstanceId> {
        let data = self.data.read().await;
        data.folders
            .get(folder)
            .map(|instances| instances.iter().map(|i| i.id.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ComputeClient for InMemoryComputeClient {
    async fn list_instances(&self, folder: &FolderId) -> ComputeResult<Vec<Instance>> {
        let data = self.data.read().await;
        if data.failing_folders.contains(folder) {
            return Err(ComputeError::Unavailable {
                attempts: 1,
                message: format!("listing folder {} failed", folder),
            });
        }
        Ok(data.folders.get(folder).cloned().unwrap_or_default())
    }

    async fn delete_instance(&self, id: &InstanceId) -> ComputeResult<()> {
        let mut data = self.data.write().await;
        data.delete_calls.push(id.clone());

        if let Some(error) = data.failing.get(id) {
            return Err(error.clone());
        }

        for instances in data.folders.values_mut() {
            instances.retain(|instance| &instance.id != id);
        }
        Ok(())
    }
}
