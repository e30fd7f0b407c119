use crate::protocol::StatusResponse;
use anyhow::{Result, bail, ensure};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// How often, and how many times, a client asks for the status of a job
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PollCadence {
    pub interval: Duration,
    pub max_attempts: usize,
}

impl Default for PollCadence {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 150,
        }
    }
}

/// Calls `fetch` until it returns a `completed` response, waiting `cadence.interval` between attempts.
///
/// `processing` responses, `error` responses and failed fetches are all retried.
/// Fails once `cadence.max_attempts` attempts did not yield the result.
pub async fn poll_until_complete<F, Fut>(mut fetch: F, cadence: PollCadence) -> Result<StatusResponse>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<StatusResponse>>,
{
    ensure!(cadence.max_attempts > 0, "at least one attempt is required");

    for attempt in 1..=cadence.max_attempts {
        match fetch().await {
            Ok(response @ StatusResponse::Completed { .. }) => {
                debug!("[POLL] completed after {attempt} attempt(s)");
                return Ok(response);
            }
            Ok(StatusResponse::Processing { job_id, .. }) => {
                debug!("[POLL] job {job_id} processing (attempt {attempt})");
            }
            Ok(StatusResponse::Error { error, .. }) => {
                warn!("[POLL] status query failed (attempt {attempt}): {error}");
            }
            Err(e) => {
                warn!("[POLL] fetch failed (attempt {attempt}): {e:#}");
            }
        }
        if attempt < cadence.max_attempts {
            tokio::time::sleep(cadence.interval).await;
        }
    }
    bail!(
        "job not completed after {} attempt(s) at {:?} intervals",
        cadence.max_attempts,
        cadence.interval
    )
}
