use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{
    dispatcher::{DeletionDispatcher, Dispatch},
    listing::list_recursive,
};
use crate::{
    domain::{
        errors::StorageResult,
        models::{DeleteFailure, StorageSweepReport, TtlPolicy},
        value_objects::ObjectKey,
    },
    ports::{
        clock::Clock,
        services::StorageSweepService,
        storage::{ObjectInfo, ObjectStore},
    },
};

pub const DEFAULT_WORKERS: usize = 8;
pub const MAX_WORKERS: usize = 256;

// Queue slots per worker between the listing and the pool
const QUEUE_DEPTH_PER_WORKER: usize = 16;

/// Run-time switches of a storage sweep
#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub dry_run: bool,
    pub workers: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Implementation of the StorageSweepService
#[derive(Clone)]
pub struct StorageSweepServiceImpl {
    store: Arc<dyn ObjectStore>,
    policy: TtlPolicy,
    options: SweepOptions,
    clock: Arc<dyn Clock>,
}

impl StorageSweepServiceImpl {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        policy: TtlPolicy,
        options: SweepOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            policy,
            options,
            clock,
        }
    }

    pub fn policy(&self) -> &TtlPolicy {
        &self.policy
    }

    pub fn options(&self) -> &SweepOptions {
        &self.options
    }
}

/// Read-only state shared by every unit of one sweep
struct UnitContext {
    policy: TtlPolicy,
    dispatcher: DeletionDispatcher,
    now: DateTime<Utc>,
}

#[derive(Default)]
struct WorkerTally {
    expired: Vec<ObjectKey>,
    deleted: Vec<ObjectKey>,
    failures: Vec<DeleteFailure>,
}

impl UnitContext {
    /// Evaluate one discovered object and delete it if it has expired
    async fn process(&self, object: ObjectInfo, tally: &mut WorkerTally) {
        let verdict = self
            .policy
            .evaluate(&object.key, object.last_modified, self.now);
        if !verdict.expired {
            return;
        }

        tally.expired.push(object.key.clone());

        match self.dispatcher.dispatch(vec![object.key]).await {
            Dispatch::DryRun(_) => {}
            Dispatch::Executed(outcomes) => {
                for outcome in outcomes {
                    match outcome.result {
                        Ok(()) => tally.deleted.push(outcome.key),
                        Err(e) => tally.failures.push(DeleteFailure {
                            key: outcome.key,
                            error: e.to_string(),
                        }),
                    }
                }
            }
        }
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<Mutex<mpsc::Receiver<ObjectInfo>>>,
    ctx: Arc<UnitContext>,
) -> WorkerTally {
    let mut tally = WorkerTally::default();

    loop {
        // Only the receive happens under the lock; processing runs unlocked
        let next = queue.lock().await.recv().await;
        let Some(object) = next else {
            break;
        };
        ctx.process(object, &mut tally).await;
    }

    debug!(worker = worker_id, expired = tally.expired.len(), "Sweep worker done");
    tally
}

#[async_trait]
impl StorageSweepService for StorageSweepServiceImpl {
    async fn sweep(&self, prefix: &str) -> StorageResult<StorageSweepReport> {
        let started = Instant::now();
        let now = self.clock.now();
        let workers = self.options.workers.clamp(1, MAX_WORKERS);
        let dry_run = self.options.dry_run;

        info!(
            prefix,
            %now,
            workers,
            dry_run,
            default_ttl_days = self.policy.default_ttl_days(),
            test_data_ttl_days = self.policy.test_data_ttl_days(),
            "Starting storage sweep"
        );

        let ctx = Arc::new(UnitContext {
            policy: self.policy,
            dispatcher: DeletionDispatcher::new(Arc::clone(&self.store), dry_run),
            now,
        });

        let (tx, rx) = mpsc::channel::<ObjectInfo>(workers.saturating_mul(QUEUE_DEPTH_PER_WORKER));
        let rx = Arc::new(Mutex::new(rx));

        let handles: Vec<JoinHandle<WorkerTally>> = (0..workers)
            .map(|worker_id| {
                let queue = Arc::clone(&rx);
                let ctx = Arc::clone(&ctx);
                tokio::spawn(worker_loop(worker_id, queue, ctx))
            })
            .collect();

        let mut objects_scanned = 0;
        let mut listing_error = None;
        let mut listing = list_recursive(Arc::clone(&self.store), prefix);

        while let Some(item) = listing.next().await {
            match item {
                Ok(object) => {
                    objects_scanned += 1;
                    if tx.send(object).await.is_err() {
                        warn!("All sweep workers stopped, ending listing early");
                        break;
                    }
                }
                Err(e) => {
                    listing_error = Some(e);
                    break;
                }
            }
        }

        // Closing the queue lets workers drain it and exit
        drop(tx);

        let mut report = StorageSweepReport {
            objects_scanned,
            dry_run,
            ..Default::default()
        };

        for handle in handles {
            match handle.await {
                Ok(tally) => {
                    report.expired_keys.extend(tally.expired);
                    report.deleted_keys.extend(tally.deleted);
                    report.failures.extend(tally.failures);
                }
                Err(e) => error!("Sweep worker aborted: {}", e),
            }
        }

        report.expired_keys.sort();
        report.deleted_keys.sort();
        report.failures.sort_by(|a, b| a.key.cmp(&b.key));
        report.duration = started.elapsed();

        if let Some(e) = listing_error {
            error!(
                class = %e.class(),
                scanned = report.objects_scanned,
                expired = report.objects_expired(),
                deleted = report.objects_deleted(),
                "Listing failed, sweep stopped after in-flight deletions finished"
            );
            return Err(e);
        }

        info!(
            scanned = report.objects_scanned,
            expired = report.objects_expired(),
            deleted = report.objects_deleted(),
            failed = report.failures.len(),
            dry_run,
            elapsed_ms = report.duration.as_millis() as u64,
            "Storage sweep finished"
        );

        Ok(report)
    }
}
