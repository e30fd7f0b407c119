use crate::optimizer::{NestingRequest, Optimizer};
use crate::outcome::JobOutcome;
use crate::store::JobStore;
use anyhow::{Context, Result};
use curenest::validation::validate;
use log::{error, info, warn};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Runs submitted nesting requests in the background and stores their outcome under the job id.
///
/// At most `max_concurrent_jobs` optimizer runs are in progress at once, others wait for a permit.
#[derive(Clone)]
pub struct NestingRunner {
    store: Arc<dyn JobStore<JobOutcome>>,
    optimizer: Arc<dyn Optimizer>,
    semaphore: Arc<Semaphore>,
}

impl NestingRunner {
    pub fn new(
        store: Arc<dyn JobStore<JobOutcome>>,
        optimizer: Arc<dyn Optimizer>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            store,
            optimizer,
            semaphore: Arc::new(Semaphore::new(max_concurrent_jobs.max(1))),
        }
    }

    pub fn store(&self) -> &Arc<dyn JobStore<JobOutcome>> {
        &self.store
    }

    /// Validates `request` and starts the job in the background. Returns the job id to poll.
    /// Must be called from within a tokio runtime.
    pub fn submit(&self, request: NestingRequest) -> Result<String> {
        self.spawn(request).map(|(job_id, _)| job_id)
    }

    /// Like [`NestingRunner::submit`], also returning the handle of the background task.
    pub fn spawn(&self, request: NestingRequest) -> Result<(String, JoinHandle<()>)> {
        request.validate().context("invalid nesting request")?;
        let job_id = request
            .job_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        info!(
            "[RUN] accepted job {job_id}: {} tools, autoclave {} x {}",
            request.tools.len(),
            request.autoclave.length,
            request.autoclave.width
        );

        let runner = self.clone();
        let task_job_id = job_id.clone();
        let handle = tokio::spawn(async move { runner.run(task_job_id, request).await });
        Ok((job_id, handle))
    }

    async fn run(&self, job_id: String, request: NestingRequest) {
        let _permit = match self.semaphore.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!("[RUN] failed to acquire permit for job {job_id}: {e}");
                return;
            }
        };

        let optimizer = self.optimizer.clone();
        let batch_id = job_id.clone();
        let nested = tokio::task::spawn_blocking(move || optimizer.nest(&batch_id, &request))
            .await
            .context("optimizer task panicked")
            .and_then(|result| result);

        let outcome = match nested {
            Ok(batch) => {
                let validation = validate(&batch);
                if !validation.is_valid() {
                    warn!(
                        "[RUN] job {job_id} produced a batch with {} violation(s)",
                        validation.violations().len()
                    );
                }
                info!(
                    "[RUN] job {job_id} completed: {} placements",
                    batch.placements.len()
                );
                JobOutcome::Nesting(batch)
            }
            Err(e) => {
                warn!("[RUN] job {job_id} failed: {e:#}");
                JobOutcome::Failed {
                    reason: format!("{e:#}"),
                }
            }
        };

        if let Err(e) = self.store.put(&job_id, outcome) {
            error!("[RUN] failed to store outcome of job {job_id}: {e:#}");
        }
    }
}
