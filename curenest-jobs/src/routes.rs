use crate::optimizer::{NestingRequest, Optimizer};
use crate::outcome::JobOutcome;
use crate::protocol::{StatusEndpoint, StatusResponse};
use crate::runner::NestingRunner;
use crate::store::JobStore;
use anyhow::{Context, anyhow};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use curenest::io::ext_repr::ExtNestingBatch;
use curenest::io::import::import_batch;
use jiff::Timestamp;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared state of all routes
#[derive(Clone)]
pub struct AppState {
    pub runner: NestingRunner,
    pub endpoint: StatusEndpoint,
}

impl AppState {
    pub fn new(
        store: Arc<dyn JobStore<JobOutcome>>,
        optimizer: Arc<dyn Optimizer>,
        max_concurrent_jobs: usize,
    ) -> Self {
        Self {
            runner: NestingRunner::new(store.clone(), optimizer, max_concurrent_jobs),
            endpoint: StatusEndpoint::new(store),
        }
    }
}

/// Answer to an accepted submission
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SubmitResponse {
    pub job_id: String,
    pub timestamp: Timestamp,
}

type ErrorReply = (StatusCode, Json<StatusResponse>);

fn error_reply(status: StatusCode, err: anyhow::Error) -> ErrorReply {
    (status, Json(StatusResponse::error(&err)))
}

pub async fn submit_job_handler(
    State(state): State<AppState>,
    payload: Result<Json<NestingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ErrorReply> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("[HTTP] rejected submission: {rejection}");
        error_reply(
            StatusCode::BAD_REQUEST,
            anyhow!(rejection.body_text()).context("malformed nesting request"),
        )
    })?;

    match state.runner.submit(request) {
        Ok(job_id) => Ok((
            StatusCode::ACCEPTED,
            Json(SubmitResponse {
                job_id,
                timestamp: Timestamp::now(),
            }),
        )),
        Err(e) => {
            warn!("[HTTP] rejected submission: {e:#}");
            Err(error_reply(StatusCode::BAD_REQUEST, e))
        }
    }
}

pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> (StatusCode, Json<StatusResponse>) {
    let response = state.endpoint.status(&job_id);
    let status = match response.is_error() {
        true => StatusCode::INTERNAL_SERVER_ERROR,
        false => StatusCode::OK,
    };
    (status, Json(response))
}

/// Accepts a batch produced by an optimizer running outside of this service.
pub async fn deliver_result_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    payload: Result<Json<ExtNestingBatch>, JsonRejection>,
) -> Result<StatusCode, ErrorReply> {
    let Json(ext_batch) = payload.map_err(|rejection| {
        warn!("[HTTP] rejected result for job {job_id}: {rejection}");
        error_reply(
            StatusCode::UNPROCESSABLE_ENTITY,
            anyhow!(rejection.body_text()).context("malformed nesting batch"),
        )
    })?;

    let batch = import_batch(&ext_batch)
        .with_context(|| format!("malformed nesting batch for job {job_id}"))
        .map_err(|e| {
            warn!("[HTTP] {e:#}");
            error_reply(StatusCode::UNPROCESSABLE_ENTITY, e)
        })?;

    state
        .runner
        .store()
        .put(&job_id, JobOutcome::Nesting(batch))
        .with_context(|| format!("failed to store result of job {job_id}"))
        .map_err(|e| {
            error!("[HTTP] {e:#}");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e)
        })?;

    info!("[HTTP] stored external result for job {job_id}");
    Ok(StatusCode::NO_CONTENT)
}

pub fn nesting_routes() -> Router<AppState> {
    Router::new()
        .route("/nesting/jobs", post(submit_job_handler))
        .route("/nesting/jobs/:job_id/status", get(job_status_handler))
        .route("/nesting/jobs/:job_id/result", put(deliver_result_handler))
}

pub fn router(state: AppState) -> Router {
    nesting_routes().with_state(state)
}
