use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use curenest_jobs::cli::Cli;
use curenest_jobs::io;
use curenest_jobs::optimizer::ShelfOptimizer;
use curenest_jobs::outcome::JobOutcome;
use curenest_jobs::routes::{AppState, router};
use curenest_jobs::store::{InMemoryJobStore, JobStore};
use curenest_jobs::sweeper::run_sweeper;
use log::{info, warn};
use tokio::signal;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let mut config = io::read_config(args.config_file.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    info!("[MAIN] Successfully parsed ServiceConfig: {config:?}");

    let store: Arc<dyn JobStore<JobOutcome>> = Arc::new(InMemoryJobStore::<JobOutcome>::new());
    let state = AppState::new(
        store.clone(),
        Arc::new(ShelfOptimizer),
        config.max_concurrent_jobs,
    );

    // Create shutdown channel
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::broadcast::channel::<()>(1);

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .context("Failed to register SIGTERM handler")?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .context("Failed to register SIGINT handler")?;

    let shutdown_tx_clone = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("[MAIN] Received SIGTERM, initiating graceful shutdown...");
                let _ = shutdown_tx_clone.send(());
            }
            _ = sigint.recv() => {
                info!("[MAIN] Received SIGINT, initiating graceful shutdown...");
                let _ = shutdown_tx_clone.send(());
            }
        }
    });

    let sweeper = config.completed_ttl().map(|ttl| {
        tokio::spawn(run_sweeper(
            store.clone(),
            ttl,
            config.sweep_interval(),
            shutdown_tx.subscribe(),
        ))
    });

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("could not bind to {}", config.bind_address))?;
    info!("[MAIN] listening on {}", config.bind_address);

    let result = axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .context("server error");

    // stop the sweeper as well if the server exited on its own
    let _ = shutdown_tx.send(());
    if let Some(sweeper) = sweeper {
        if let Err(e) = sweeper.await {
            warn!("[MAIN] Sweeper exited with error: {e}");
        }
    }
    if let Err(e) = &result {
        warn!("[MAIN] Server exited with error: {e:#}");
    }

    result
}
