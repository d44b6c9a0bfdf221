pub mod dispatcher;
pub mod instance_sweep_service_impl;
pub mod listing;
pub mod storage_sweep_service_impl;

pub use dispatcher::{DeletionDispatcher, Dispatch};
pub use instance_sweep_service_impl::InstanceSweepServiceImpl;
pub use listing::list_recursive;
pub use storage_sweep_service_impl::{DEFAULT_WORKERS, MAX_WORKERS, StorageSweepServiceImpl, SweepOptions};
