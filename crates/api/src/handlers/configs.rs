//! Handlers for the `/configs` resource, including deployment submission.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use nethub_core::entity::{Attributes, EntityKind};
use nethub_core::error::CoreError;
use nethub_jobs::{run_job, stage_sequence, StageContext, DEPLOY_STAGES};

use crate::error::{AppError, AppResult};
use crate::handlers::entities;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/configs
///
/// Create a network config. Requires `name`, `config_type`, and `vendor`.
/// New configs always enter as a `draft` at version `1.0`.
pub async fn create_config(
    State(state): State<AppState>,
    Json(attributes): Json<Attributes>,
) -> AppResult<impl IntoResponse> {
    let config = entities::create(&state, EntityKind::Config, attributes).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: config })))
}

/// GET /api/v1/configs
pub async fn list_configs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let configs = entities::list_of_kind(&state, EntityKind::Config).await;
    Ok(Json(DataResponse { data: configs }))
}

/// GET /api/v1/configs/{id}
pub async fn get_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let config = entities::find_of_kind(&state, EntityKind::Config, &id).await?;
    Ok(Json(DataResponse { data: config }))
}

/// PUT /api/v1/configs/{id}
///
/// Merge the payload into the config's attributes. Keys not present in
/// the payload are left untouched; each call appends a history snapshot.
pub async fn update_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Attributes>,
) -> AppResult<impl IntoResponse> {
    let config = entities::update_of_kind(&state, EntityKind::Config, &id, patch).await?;
    tracing::info!(entity_id = %id, "Config updated");
    Ok(Json(DataResponse { data: config }))
}

/// GET /api/v1/configs/{id}/history
pub async fn config_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let history = entities::history_of_kind(&state, EntityKind::Config, &id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// DELETE /api/v1/configs/{id}
pub async fn delete_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    entities::delete_of_kind(&state, EntityKind::Config, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request body for `POST /configs/{id}/deploy`.
#[derive(Debug, Deserialize)]
pub struct DeployConfig {
    /// Name or address of the device the config is pushed to. Forwarded
    /// to the stage executor; not required to be a registered device.
    pub target_device: String,
}

/// POST /api/v1/configs/{id}/deploy
///
/// Submit a background deployment job (connect, apply, verify) for the
/// config and return it immediately with `202 Accepted`; callers poll
/// `/jobs/{id}` for progress.
pub async fn deploy_config(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<DeployConfig>,
) -> AppResult<impl IntoResponse> {
    if input.target_device.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "target_device must not be empty".to_string(),
        )));
    }
    let config = entities::find_of_kind(&state, EntityKind::Config, &id).await?;

    let job = state.jobs.submit(&id).await;
    let ctx = StageContext {
        job_id: job.id.clone(),
        entity_id: id.clone(),
        params: json!({
            "target_device": input.target_device,
            "config_name": config.display_name(),
        }),
    };
    tokio::spawn(run_job(
        Arc::clone(&state.jobs),
        Arc::clone(&state.executor),
        stage_sequence(DEPLOY_STAGES),
        ctx,
    ));

    tracing::info!(
        job_id = %job.id,
        entity_id = %id,
        target_device = %input.target_device,
        "Deployment job submitted"
    );
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}
