use object_store::ObjectStore as ObjectStoreBackend;
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::outbound::{
        compute::{DEFAULT_COMPUTE_ENDPOINT, HttpComputeClient, IamToken},
        storage::{ApacheObjectStoreAdapter, S3Config, create_s3_store},
    },
    domain::{
        models::{InstanceAgePolicy, RetryPolicy, TtlPolicy},
        value_objects::FolderId,
    },
    ports::{
        clock::{Clock, SystemClock},
        compute::ComputeClient,
    },
    services::{InstanceSweepServiceImpl, StorageSweepServiceImpl, SweepOptions},
};

const S3_SCHEME: &str = "s3://";

/// Bucket and key prefix parsed from an `s3://bucket/prefix` path.
///
/// The prefix is a plain string prefix, as in S3 `ListObjectsV2`: `nightly/run`
/// matches `nightly/run1/..` and `nightly/run2/..`. Bucket naming rules are
/// left to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct S3Location {
    pub bucket: String,
    pub prefix: String,
}

impl S3Location {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let rest = raw
            .strip_prefix(S3_SCHEME)
            .ok_or_else(|| AppError::Configuration {
                message: format!("URL must be an S3 URL (s3://bucket/prefix), got '{}'", raw),
            })?;

        let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(AppError::Configuration {
                message: format!("S3 path '{}' has no bucket", raw),
            });
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.trim_start_matches('/').to_string(),
        })
    }
}

impl std::fmt::Display for S3Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}/{}", S3_SCHEME, self.bucket, self.prefix)
    }
}

/// Everything a storage sweep run needs
#[derive(Debug, Clone)]
pub struct StorageSweepConfig {
    pub location: S3Location,
    pub policy: TtlPolicy,
    pub options: SweepOptions,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub retry: RetryPolicy,
}

impl StorageSweepConfig {
    pub fn s3_config(&self) -> S3Config {
        let mut s3 = S3Config::new(self.location.bucket.clone());
        s3.region = self.region.clone();
        s3.endpoint = self.endpoint.clone();
        s3.allow_http = self
            .endpoint
            .as_deref()
            .is_some_and(|endpoint| endpoint.starts_with("http://"));
        s3.retry = self.retry.clone();
        s3
    }
}

/// Everything an instance sweep run needs
#[derive(Debug, Clone)]
pub struct InstanceSweepConfig {
    pub credentials_file: PathBuf,
    pub folder: FolderId,
    pub policy: InstanceAgePolicy,
    pub apply: bool,
    pub endpoint: String,
    pub retry: RetryPolicy,
}

impl InstanceSweepConfig {
    pub fn new(credentials_file: PathBuf, folder: FolderId, policy: InstanceAgePolicy) -> Self {
        Self {
            credentials_file,
            folder,
            policy,
            apply: false,
            endpoint: DEFAULT_COMPUTE_ENDPOINT.to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Build the storage sweep against S3 (or an S3-compatible endpoint)
pub fn build_storage_sweep(config: &StorageSweepConfig) -> Result<StorageSweepServiceImpl, AppError> {
    let backend = create_s3_store(&config.s3_config()).map_err(|e| AppError::StorageInit {
        message: format!("{:#}", e),
    })?;

    Ok(build_storage_sweep_with_store(config, backend))
}

/// Build the storage sweep over an already constructed store
pub fn build_storage_sweep_with_store(
    config: &StorageSweepConfig,
    backend: Arc<dyn ObjectStoreBackend>,
) -> StorageSweepServiceImpl {
    StorageSweepServiceImpl::new(
        Arc::new(ApacheObjectStoreAdapter::new(backend)),
        config.policy,
        config.options.clone(),
        system_clock(),
    )
}

/// Build the instance sweep against the compute REST API
pub fn build_instance_sweep(config: &InstanceSweepConfig) -> Result<InstanceSweepServiceImpl, AppError> {
    let token = IamToken::from_file(&config.credentials_file).map_err(|e| {
        AppError::ComputeInit {
            message: format!(
                "Failed to read credentials from {}: {}",
                config.credentials_file.display(),
                e
            ),
        }
    })?;

    let client = HttpComputeClient::new(config.endpoint.clone(), token, config.retry.clone())
        .map_err(|e| AppError::ComputeInit {
            message: e.to_string(),
        })?;

    Ok(build_instance_sweep_with_client(config, Arc::new(client)))
}

/// Build the instance sweep over any compute client
pub fn build_instance_sweep_with_client(
    config: &InstanceSweepConfig,
    client: Arc<dyn ComputeClient>,
) -> InstanceSweepServiceImpl {
    InstanceSweepServiceImpl::new(client, config.policy.clone(), config.apply, system_clock())
}

fn system_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

/// Install the global tracing subscriber. `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.to_lowercase()))
        .map_err(|e| AppError::Configuration {
            message: format!("Invalid log level '{}': {}", level, e),
        })?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .try_init()
        .map_err(|e| AppError::Configuration {
            message: format!("Failed to initialise logging: {}", e),
        })
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Compute client initialization error: {message}")]
    ComputeInit { message: String },
}
