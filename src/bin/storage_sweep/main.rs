use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use tracing::{error, info};
use ttl_sweeper::{
    app::{S3Location, StorageSweepConfig, build_storage_sweep, init_logging},
    domain::models::{DEFAULT_MAX_RETRIES, DEFAULT_TEST_DATA_TTL_DAYS, DEFAULT_TTL_DAYS, RetryPolicy, TtlPolicy},
    ports::services::StorageSweepService,
    services::{DEFAULT_WORKERS, MAX_WORKERS, SweepOptions},
};

#[derive(Parser, Debug)]
#[command(name = "storage-ttl-sweep")]
#[command(about = "Delete expired objects from an S3 bucket based on TTL", long_about = None)]
struct Cli {
    /// S3 path in the format s3://bucket/prefix
    s3_path: String,

    /// Default TTL in days
    #[arg(long, env = "DEFAULT_TTL", default_value_t = DEFAULT_TTL_DAYS)]
    default_ttl: u32,

    /// TTL in days for objects under a test_data directory
    #[arg(long, env = "TEST_DATA_TTL", default_value_t = DEFAULT_TEST_DATA_TTL_DAYS)]
    test_data_ttl: u32,

    /// Log what would be deleted without deleting anything
    #[arg(long)]
    dry_run: bool,

    /// Number of concurrent sweep workers (1-256)
    #[arg(
        long,
        env = "SWEEP_WORKERS",
        default_value_t = DEFAULT_WORKERS as u16,
        value_parser = clap::value_parser!(u16).range(1..=MAX_WORKERS as i64)
    )]
    workers: u16,

    /// S3 region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Endpoint URL for S3-compatible stores
    #[arg(long, env = "S3_ENDPOINT")]
    endpoint: Option<String>,

    /// Retries for throttled or unavailable store requests
    #[arg(long, env = "SWEEP_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_sweep_config(&self) -> Result<StorageSweepConfig> {
        let location = S3Location::parse(&self.s3_path)?;
        let policy = TtlPolicy::new(self.default_ttl, self.test_data_ttl)
            .context("Invalid TTL configuration")?;

        Ok(StorageSweepConfig {
            location,
            policy,
            options: SweepOptions {
                dry_run: self.dry_run,
                workers: usize::from(self.workers),
            },
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            retry: RetryPolicy::new(self.max_retries, Duration::from_secs(1)),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    let config = cli.to_sweep_config()?;

    info!(
        "Starting script with parameters: Bucket: {}, Prefix: {}, Default TTL: {}, Test Data TTL: {}, Dry Run: {}",
        config.location.bucket,
        config.location.prefix,
        config.policy.default_ttl_days(),
        config.policy.test_data_ttl_days(),
        config.options.dry_run
    );

    let service = build_storage_sweep(&config).context("Failed to build storage sweep")?;

    // Sweep failures are reported in the log; the process still exits cleanly
    match service.sweep(&config.location.prefix).await {
        Ok(report) => info!(
            scanned = report.objects_scanned,
            expired = report.objects_expired(),
            deleted = report.objects_deleted(),
            failed = report.failures.len(),
            "Finished sweeping {}",
            config.location
        ),
        Err(e) => error!(class = %e.class(), "Error processing S3 bucket: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "storage-ttl-sweep",
            "s3://ci-artifacts/nightly",
            "--default-ttl",
            "14",
            "--test-data-ttl",
            "3",
            "--dry-run",
            "--workers",
            "4",
        ]);

        let config = cli.to_sweep_config().unwrap();
        assert_eq!(config.location.bucket.as_str(), "ci-artifacts");
        assert_eq!(config.location.prefix, "nightly");
        assert_eq!(config.policy.default_ttl_days(), 14);
        assert_eq!(config.policy.test_data_ttl_days(), 3);
        assert!(config.options.dry_run);
        assert_eq!(config.options.workers, 4);
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let cli = Cli::parse_from(["storage-ttl-sweep", "s3://ci-artifacts", "--default-ttl", "0"]);
        assert!(cli.to_sweep_config().is_err());
    }

    #[test]
    fn test_worker_count_is_bounded() {
        for workers in ["0", "257", "1000000"] {
            let parsed =
                Cli::try_parse_from(["storage-ttl-sweep", "s3://ci-artifacts", "--workers", workers]);
            assert!(parsed.is_err(), "--workers {} was accepted", workers);
        }

        let cli = Cli::parse_from(["storage-ttl-sweep", "s3://ci-artifacts", "--workers", "256"]);
        assert_eq!(cli.to_sweep_config().unwrap().options.workers, 256);
    }

    #[test]
    fn test_non_s3_path_is_rejected() {
        let cli = Cli::parse_from(["storage-ttl-sweep", "https://ci-artifacts/nightly"]);
        assert!(cli.to_sweep_config().is_err());
    }
}
