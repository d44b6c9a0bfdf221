mod instance_sweep_service;
mod storage_sweep_service;

pub use instance_sweep_service::InstanceSweepService;
pub use storage_sweep_service::StorageSweepService;
