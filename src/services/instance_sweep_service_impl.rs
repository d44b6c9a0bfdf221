use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::{
    domain::{
        errors::{ComputeResult, ErrorClass},
        models::{InstanceAction, InstanceAgePolicy, InstanceFailure, InstanceSweepReport, KeepReason},
        value_objects::{FolderId, InstanceId},
    },
    ports::{clock::Clock, compute::ComputeClient, services::InstanceSweepService},
};

/// Implementation of the InstanceSweepService
#[derive(Clone)]
pub struct InstanceSweepServiceImpl {
    client: Arc<dyn ComputeClient>,
    policy: InstanceAgePolicy,
    apply: bool,
    clock: Arc<dyn Clock>,
}

impl InstanceSweepServiceImpl {
    pub fn new(
        client: Arc<dyn ComputeClient>,
        policy: InstanceAgePolicy,
        apply: bool,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            policy,
            apply,
            clock,
        }
    }

    pub fn policy(&self) -> &InstanceAgePolicy {
        &self.policy
    }

    pub fn applies(&self) -> bool {
        self.apply
    }
}

#[async_trait]
impl InstanceSweepService for InstanceSweepServiceImpl {
    async fn sweep(&self, folder: &FolderId) -> ComputeResult<InstanceSweepReport> {
        let now = self.clock.now();
        let ttl_hours = self.policy.ttl_hours();

        let allow_list: Vec<&str> = self
            .policy
            .allow_list()
            .iter()
            .map(InstanceId::as_str)
            .collect();

        info!(
            folder = %folder,
            ttl_hours,
            threshold = %self.policy.threshold(now),
            apply = self.apply,
            ?allow_list,
            "Starting instance sweep"
        );

        let instances = self.client.list_instances(folder).await?;

        let mut report = InstanceSweepReport {
            instances_scanned: instances.len(),
            applied: self.apply,
            ..Default::default()
        };

        for instance in &instances {
            let verdict = self.policy.evaluate(instance, now);

            match verdict.action {
                InstanceAction::Keep(KeepReason::AllowListed) => {
                    debug!("VM {} is allow-listed, skipping it", verdict.id);
                    report.kept += 1;
                }
                InstanceAction::Keep(KeepReason::TooYoung) => {
                    info!(
                        "VM {} is younger than {} hours, keeping it, created at {}",
                        verdict.id, ttl_hours, verdict.created_at
                    );
                    report.kept += 1;
                }
                InstanceAction::Delete => {
                    info!(
                        "VM {} is older than {} hours, deleting it",
                        verdict.id, ttl_hours
                    );
                    report.candidates.push(verdict.id.clone());

                    if !self.apply {
                        info!("Preview only, not deleting VM {}", verdict.id);
                        continue;
                    }

                    match self.client.delete_instance(&verdict.id).await {
                        Ok(()) => report.deleted.push(verdict.id),
                        Err(e) if e.class() == ErrorClass::Authentication => {
                            error!("Failed to delete VM {}: {}", verdict.id, e);
                            return Err(e);
                        }
                        Err(e) => {
                            warn!(class = %e.class(), "Failed to delete VM {}: {}", verdict.id, e);
                            report.failures.push(InstanceFailure {
                                id: verdict.id,
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        info!(
            scanned = report.instances_scanned,
            candidates = report.candidates.len(),
            deleted = report.deleted.len(),
            kept = report.kept,
            failed = report.failures.len(),
            apply = self.apply,
            "Instance sweep finished"
        );

        Ok(report)
    }
}
