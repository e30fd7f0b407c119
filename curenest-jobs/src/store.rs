use anyhow::Result;
use jiff::Timestamp;
use log::debug;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A job result waiting to be delivered
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedJob<T> {
    pub result: T,
    /// Moment the result was stored
    pub completed_at: Timestamp,
}

/// Answer of [`JobStore::poll`]
#[derive(Clone, Debug, PartialEq)]
pub enum PollStatus<T> {
    /// No result is stored for the job id: the job is still running, the id is unknown
    /// or the result was already delivered.
    Processing,
    /// The stored result, which has been removed from the store
    Completed(CompletedJob<T>),
}

impl<T> PollStatus<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, PollStatus::Completed(_))
    }
}

/// Keyed store handing over job results from the producer to a polling consumer.
///
/// Every stored result is delivered at most once: the poll that observes it also removes it.
pub trait JobStore<T>: Send + Sync {
    /// Stores the result of job `job_id`, replacing any undelivered result of the same id.
    fn put(&self, job_id: &str, result: T) -> Result<()>;

    /// Takes the result of `job_id` out of the store if there is one.
    fn poll(&self, job_id: &str) -> Result<PollStatus<T>>;

    /// Removes all undelivered results completed before `cutoff` and returns how many were removed.
    fn evict_completed_before(&self, cutoff: Timestamp) -> Result<usize>;

    /// Number of undelivered results
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// [`JobStore`] keeping all results in memory, behind a single lock.
#[derive(Debug)]
pub struct InMemoryJobStore<T> {
    entries: Mutex<HashMap<String, CompletedJob<T>>>,
}

impl<T> InMemoryJobStore<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// A panic while holding the lock cannot leave the map half-updated, so a poisoned lock is still usable.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, CompletedJob<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for InMemoryJobStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> JobStore<T> for InMemoryJobStore<T> {
    fn put(&self, job_id: &str, result: T) -> Result<()> {
        let job = CompletedJob {
            result,
            completed_at: Timestamp::now(),
        };
        let replaced = self.entries().insert(job_id.to_string(), job).is_some();
        debug!("[STORE] put job {job_id} (replaced undelivered result: {replaced})");
        Ok(())
    }

    fn poll(&self, job_id: &str) -> Result<PollStatus<T>> {
        let status = match self.entries().remove(job_id) {
            Some(job) => PollStatus::Completed(job),
            None => PollStatus::Processing,
        };
        Ok(status)
    }

    fn evict_completed_before(&self, cutoff: Timestamp) -> Result<usize> {
        let mut entries = self.entries();
        let n_before = entries.len();
        entries.retain(|_, job| job.completed_at >= cutoff);
        Ok(n_before - entries.len())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.entries().len())
    }
}
