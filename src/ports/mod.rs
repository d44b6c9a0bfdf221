pub mod clock;
pub mod compute;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use compute::ComputeClient;
pub use services::{InstanceSweepService, StorageSweepService};
pub use storage::{DeleteOutcome, Listing, ObjectInfo, ObjectStore};
