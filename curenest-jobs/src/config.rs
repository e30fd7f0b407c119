use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of the job service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// Maximum number of optimizer runs in progress at once
    pub max_concurrent_jobs: usize,
    /// Undelivered results older than this many seconds are evicted. If undefined, results are kept until polled
    pub completed_ttl_secs: Option<u64>,
    /// Seconds between two eviction sweeps
    pub sweep_interval_secs: u64,
}

impl ServiceConfig {
    pub fn completed_ttl(&self) -> Option<Duration> {
        self.completed_ttl_secs.map(Duration::from_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            max_concurrent_jobs: 20,
            completed_ttl_secs: None,
            sweep_interval_secs: 60,
        }
    }
}
