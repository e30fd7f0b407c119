use crate::outcome::{ExtJobResult, JobOutcome, export_outcome};
use crate::store::{JobStore, PollStatus};
use anyhow::Context;
use jiff::Timestamp;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Message accompanying a `processing` response.
/// The same answer is given for running jobs, unknown ids and already delivered results.
pub const PROCESSING_MESSAGE: &str = "job is still processing, or its id is unknown or already delivered";

/// Answer to a status query, tagged by `status`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusResponse {
    Processing {
        job_id: String,
        message: String,
        timestamp: Timestamp,
    },
    /// One-time delivery of the result, `timestamp` is the moment the job completed
    Completed {
        job_id: String,
        result: ExtJobResult,
        timestamp: Timestamp,
    },
    /// The query itself failed, the job is unaffected
    Error {
        error: String,
        detail: String,
        timestamp: Timestamp,
    },
}

impl StatusResponse {
    pub fn processing(job_id: &str) -> Self {
        StatusResponse::Processing {
            job_id: job_id.to_string(),
            message: PROCESSING_MESSAGE.to_string(),
            timestamp: Timestamp::now(),
        }
    }

    /// `error` holds the outermost message of `err`, `detail` the full chain of causes.
    pub fn error(err: &anyhow::Error) -> Self {
        StatusResponse::Error {
            error: err.to_string(),
            detail: format!("{err:#}"),
            timestamp: Timestamp::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, StatusResponse::Completed { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusResponse::Error { .. })
    }
}

/// Answers status queries from a [`JobStore`].
#[derive(Clone)]
pub struct StatusEndpoint {
    store: Arc<dyn JobStore<JobOutcome>>,
}

impl StatusEndpoint {
    pub fn new(store: Arc<dyn JobStore<JobOutcome>>) -> Self {
        Self { store }
    }

    /// Polls the store for `job_id`. Returns immediately, a completed result is only ever returned once.
    pub fn status(&self, job_id: &str) -> StatusResponse {
        let polled = self
            .store
            .poll(job_id)
            .with_context(|| format!("failed to poll job {job_id}"));

        match polled {
            Ok(PollStatus::Processing) => StatusResponse::processing(job_id),
            Ok(PollStatus::Completed(job)) => {
                info!("[STATUS] delivering result of job {job_id}");
                StatusResponse::Completed {
                    job_id: job_id.to_string(),
                    result: export_outcome(&job.result),
                    timestamp: job.completed_at,
                }
            }
            Err(e) => {
                error!("[STATUS] {e:#}");
                StatusResponse::error(&e)
            }
        }
    }
}
