use std::time::Duration;

use crate::domain::value_objects::{InstanceId, ObjectKey};

/// A delete call that failed for one object
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteFailure {
    pub key: ObjectKey,
    pub error: String,
}

/// Results of one storage sweep
#[derive(Debug, Clone, Default)]
pub struct StorageSweepReport {
    pub objects_scanned: usize,
    /// Keys judged expired, sorted. In dry-run this is the would-delete set.
    pub expired_keys: Vec<ObjectKey>,
    /// Keys actually removed, sorted. Always empty in dry-run.
    pub deleted_keys: Vec<ObjectKey>,
    pub failures: Vec<DeleteFailure>,
    pub dry_run: bool,
    pub duration: Duration,
}

impl StorageSweepReport {
    pub fn objects_expired(&self) -> usize {
        self.expired_keys.len()
    }

    pub fn objects_deleted(&self) -> usize {
        self.deleted_keys.len()
    }
}

/// A delete call that failed for one instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceFailure {
    pub id: InstanceId,
    pub error: String,
}

/// Results of one instance sweep
#[derive(Debug, Clone, Default)]
pub struct InstanceSweepReport {
    pub instances_scanned: usize,
    /// Instances old enough to delete, in listing order
    pub candidates: Vec<InstanceId>,
    pub deleted: Vec<InstanceId>,
    pub kept: usize,
    pub failures: Vec<InstanceFailure>,
    pub applied: bool,
}
