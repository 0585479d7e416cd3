//! Handlers for the `/jobs` resource.
//!
//! Deployments and syncs submit jobs through their own endpoints; this
//! module adds a generic submission route for ad-hoc stage sequences plus
//! the read side every submission shares.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use nethub_jobs::{run_job, validate_stages, StageContext};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /jobs`.
#[derive(Debug, Deserialize)]
pub struct SubmitJob {
    /// Registry entity the job operates on; any kind is accepted.
    pub entity_id: String,
    /// Stage names, executed in order. Must be non-empty.
    pub stages: Vec<String>,
    /// Free-form parameters forwarded to the stage executor.
    #[serde(default)]
    pub params: Value,
}

/// POST /api/v1/jobs
///
/// Submit a job with an explicit stage sequence. The job is returned in
/// `pending` status with `202 Accepted` while the stages run in the
/// background.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(input): Json<SubmitJob>,
) -> AppResult<impl IntoResponse> {
    validate_stages(&input.stages)?;
    let entity = state
        .store
        .get(&input.entity_id)
        .await
        .ok_or_else(|| AppError::not_found("Entity", &input.entity_id))?;

    let job = state.jobs.submit(&entity.id).await;
    let ctx = StageContext {
        job_id: job.id.clone(),
        entity_id: entity.id.clone(),
        params: input.params,
    };
    tokio::spawn(run_job(
        Arc::clone(&state.jobs),
        Arc::clone(&state.executor),
        input.stages,
        ctx,
    ));

    tracing::info!(job_id = %job.id, entity_id = %entity.id, "Job submitted");
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs
///
/// List every submitted job in submission order.
pub async fn list_jobs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let jobs = state.jobs.list().await;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = state
        .jobs
        .get(&id)
        .await
        .ok_or_else(|| AppError::not_found("Job", &id))?;
    Ok(Json(DataResponse { data: job }))
}
