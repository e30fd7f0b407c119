//! Job lifecycle around the nesting of autoclave batches.
//!
//! Nesting requests are handed to an [`Optimizer`](optimizer::Optimizer) by the
//! [`NestingRunner`](runner::NestingRunner), which writes the outcome into a [`JobStore`](store::JobStore).
//! Clients poll the [`StatusEndpoint`](protocol::StatusEndpoint) until the result is delivered, exactly once.

use std::sync::LazyLock;
use std::time::Instant;

/// Command line interface of the service binary
pub mod cli;

/// Polling client
pub mod client;

pub mod config;

/// Logging and config file reading
pub mod io;

/// Nesting requests and the optimizers that answer them
pub mod optimizer;

/// Results of a nesting job and their external representation
pub mod outcome;

/// Status responses and the endpoint producing them
pub mod protocol;

/// HTTP surface
pub mod routes;

pub mod runner;

/// Keyed storage of completed jobs
pub mod store;

pub mod sweeper;

pub static EPOCH: LazyLock<Instant> = LazyLock::new(Instant::now);
