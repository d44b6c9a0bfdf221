pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - policies, value objects, reports and errors
pub use domain::{
    AllowList,
    ComputeError,
    ErrorClass,
    FolderId,
    Instance,
    InstanceAgePolicy,
    InstanceId,
    InstanceSweepReport,
    ObjectCategory,
    // Value objects
    ObjectKey,
    RetryPolicy,
    // Errors
    StorageError,
    StorageSweepReport,
    // Models
    TtlPolicy,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{
    Clock,
    ComputeClient,
    InstanceSweepService,
    ObjectInfo,
    // Storage ports
    ObjectStore,
    // Service ports
    StorageSweepService,
};

// Service implementations - sweep logic
pub use services::{InstanceSweepServiceImpl, StorageSweepServiceImpl, SweepOptions};

// Application factory and configuration
pub use app::{
    AppError, InstanceSweepConfig, S3Location, StorageSweepConfig, build_instance_sweep,
    build_instance_sweep_with_client, build_storage_sweep, build_storage_sweep_with_store,
    init_logging,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    compute::{HttpComputeClient, InMemoryComputeClient},
    storage::ApacheObjectStoreAdapter,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AllowList, ApacheObjectStoreAdapter, FolderId, InMemoryComputeClient, InstanceAgePolicy,
        InstanceId, InstanceSweepService, InstanceSweepServiceImpl, ObjectKey, ObjectStore,
        StorageSweepService, StorageSweepServiceImpl, SweepOptions, TtlPolicy,
        build_instance_sweep, build_storage_sweep,
    };
}
