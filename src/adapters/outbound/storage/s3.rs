//! S3 backend construction using the object_store crate

use anyhow::{Context, Result};
use object_store::{
    BackoffConfig, ObjectStore as ObjectStoreBackend, RetryConfig, aws::AmazonS3Builder,
};
use std::{sync::Arc, time::Duration};

use crate::domain::models::RetryPolicy;

/// Configuration for S3 storage backend
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub allow_http: bool,
    pub retry: RetryPolicy,
}

impl S3Config {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: None,
            endpoint: None,
            allow_http: false,
            retry: RetryPolicy::default(),
        }
    }
}

/// Translate the crate's retry policy into the client's own retry settings.
/// The client retries 5xx responses (including 503) and connection errors.
pub fn retry_config(policy: &RetryPolicy) -> RetryConfig {
    RetryConfig {
        backoff: BackoffConfig {
            init_backoff: policy.base_delay,
            max_backoff: policy.max_delay,
            base: policy.multiplier,
        },
        max_retries: policy.max_retries as usize,
        retry_timeout: Duration::from_secs(180),
    }
}

/// Create an S3 store from configuration.
/// Credentials and anything not set here come from the standard `AWS_*`
/// environment variables.
pub fn create_s3_store(config: &S3Config) -> Result<Arc<dyn ObjectStoreBackend>> {
    let mut builder = AmazonS3Builder::from_env()
        .with_bucket_name(&config.bucket)
        .with_retry(retry_config(&config.retry));

    if let Some(region) = &config.region {
        builder = builder.with_region(region);
    }

    if let Some(endpoint) = &config.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_allow_http(config.allow_http);
    }

    let store = builder.build().context("Failed to build S3 store")?;

    Ok(Arc::new(store))
}
