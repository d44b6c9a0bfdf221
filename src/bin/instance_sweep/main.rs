use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, time::Duration};
use tracing::{error, info};
use ttl_sweeper::{
    app::{InstanceSweepConfig, build_instance_sweep, init_logging},
    adapters::outbound::compute::DEFAULT_COMPUTE_ENDPOINT,
    domain::{
        models::{AllowList, DEFAULT_MAX_RETRIES, InstanceAgePolicy, RetryPolicy},
        value_objects::{FolderId, InstanceId},
    },
    ports::services::InstanceSweepService,
};

#[derive(Parser, Debug)]
#[command(name = "instance-ttl-sweep")]
#[command(about = "Delete compute instances older than a TTL", long_about = None)]
struct Cli {
    /// File holding the IAM token (raw or JSON with an "iam_token" field)
    #[arg(long, env = "CLOUD_CREDENTIALS_FILE")]
    credentials_file: PathBuf,

    /// Folder whose instances are swept
    #[arg(long, env = "FOLDER_ID")]
    folder_id: String,

    /// Instances older than this many hours are deleted
    #[arg(long, env = "INSTANCE_TTL_HOURS")]
    ttl_hours: u32,

    /// Actually delete; without this flag the sweep only previews
    #[arg(long)]
    apply: bool,

    /// Extra instance ids that must never be deleted
    #[arg(long = "allow", value_name = "INSTANCE_ID")]
    allow: Vec<String>,

    /// Compute API endpoint
    #[arg(long, env = "COMPUTE_ENDPOINT", default_value = DEFAULT_COMPUTE_ENDPOINT)]
    endpoint: String,

    /// Retries when the compute API is unavailable
    #[arg(long, env = "SWEEP_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    max_retries: u32,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_sweep_config(&self) -> Result<InstanceSweepConfig> {
        let folder = FolderId::new(self.folder_id.as_str()).context("Invalid folder id")?;

        let mut allow_list = AllowList::default();
        for id in &self.allow {
            allow_list.insert(InstanceId::new(id.as_str()).context("Invalid allow-listed id")?);
        }

        let policy =
            InstanceAgePolicy::new(self.ttl_hours, allow_list).context("Invalid TTL configuration")?;

        Ok(InstanceSweepConfig {
            credentials_file: self.credentials_file.clone(),
            folder,
            policy,
            apply: self.apply,
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
        "Starting instance sweep: Folder: {}, TTL hours: {}, Apply: {}, Endpoint: {}",
        config.folder,
        config.policy.ttl_hours(),
        config.apply,
        config.endpoint
    );

    let service = build_instance_sweep(&config).context("Failed to build instance sweep")?;

    // Sweep failures are reported in the log; the process still exits cleanly
    match service.sweep(&config.folder).await {
        Ok(report) => info!(
            scanned = report.instances_scanned,
            candidates = report.candidates.len(),
            deleted = report.deleted.len(),
            failed = report.failures.len(),
            "Finished sweeping folder {}",
            config.folder
        ),
        Err(e) => error!(class = %e.class(), "Error sweeping instances: {}", e),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttl_sweeper::domain::models::CACHE_INSTANCE_ID;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "instance-ttl-sweep",
            "--credentials-file",
            "/tmp/token.json",
            "--folder-id",
            "ci-folder",
            "--ttl-hours",
            "24",
            "--allow",
            "vm-keep-1",
            "--allow",
            "vm-keep-2",
        ]);

        let config = cli.to_sweep_config().unwrap();
        assert!(!config.apply);
        assert_eq!(config.folder.as_str(), "ci-folder");
        assert_eq!(config.policy.ttl_hours(), 24);

        let allow = config.policy.allow_list();
        assert_eq!(allow.iter().count(), 3);
        assert!(allow.contains(&InstanceId::new(CACHE_INSTANCE_ID).unwrap()));
        assert!(allow.contains(&InstanceId::new("vm-keep-2").unwrap()));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        let cli = Cli::parse_from([
            "instance-ttl-sweep",
            "--credentials-file",
            "/tmp/token.json",
            "--folder-id",
            "ci-folder",
            "--ttl-hours",
            "0",
            "--apply",
        ]);
        assert!(cli.to_sweep_config().is_err());
    }
}
