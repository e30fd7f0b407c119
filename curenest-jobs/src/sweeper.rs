use crate::outcome::JobOutcome;
use crate::store::JobStore;
use anyhow::{Context, Result};
use jiff::Timestamp;
use log::{debug, error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

/// Periodically evicts results that were never polled and are older than `ttl`.
/// Runs until a shutdown signal is received.
pub async fn run_sweeper(
    store: Arc<dyn JobStore<JobOutcome>>,
    ttl: Duration,
    interval: Duration,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    info!("[SWEEP] evicting undelivered results after {ttl:?}, checking every {interval:?}");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("[SWEEP] received shutdown signal");
                break;
            }
            _ = ticker.tick() => {
                match sweep(store.as_ref(), ttl) {
                    Ok(0) => {}
                    Ok(n) => info!("[SWEEP] evicted {n} undelivered result(s)"),
                    Err(e) => error!("[SWEEP] {e:#}"),
                }
            }
        }
    }
}

fn sweep(store: &dyn JobStore<JobOutcome>, ttl: Duration) -> Result<usize> {
    let cutoff = Timestamp::now()
        .checked_sub(ttl)
        .context("eviction cutoff out of range")?;
    debug!("[SWEEP] evicting results completed before {cutoff}");
    store
        .evict_completed_before(cutoff)
        .context("failed to evict completed jobs")
}
