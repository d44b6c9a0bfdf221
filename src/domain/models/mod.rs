pub mod instance;
pub mod report;
pub mod retry;
pub mod ttl_policy;

pub use instance::{
    AllowList, CACHE_INSTANCE_ID, Instance, InstanceAction, InstanceAgePolicy, InstanceVerdict,
    KeepReason,
};
pub use report::{DeleteFailure, InstanceFailure, InstanceSweepReport, StorageSweepReport};
pub use retry::{DEFAULT_MAX_RETRIES, RetryPolicy};
pub use ttl_policy::{
    DEFAULT_TEST_DATA_TTL_DAYS, DEFAULT_TTL_DAYS, ObjectCategory, ObjectVerdict,
    TEST_DATA_SEGMENT, TtlPolicy,
};
