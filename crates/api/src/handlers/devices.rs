//! Handlers for the `/devices` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use nethub_core::entity::{Attributes, EntityKind};

use crate::error::{AppError, AppResult};
use crate::handlers::entities;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/devices
///
/// Register a device. Requires `name`, `device_type`, and `location`;
/// everything else is stored as-is. The device starts `offline` with a
/// full battery until it reports metrics.
pub async fn register_device(
    State(state): State<AppState>,
    Json(attributes): Json<Attributes>,
) -> AppResult<impl IntoResponse> {
    let device = entities::create(&state, EntityKind::Device, attributes).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: device })))
}

/// GET /api/v1/devices
pub async fn list_devices(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let devices = entities::list_of_kind(&state, EntityKind::Device).await;
    Ok(Json(DataResponse { data: devices }))
}

/// GET /api/v1/devices/{id}
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let device = entities::find_of_kind(&state, EntityKind::Device, &id).await?;
    Ok(Json(DataResponse { data: device }))
}

/// POST /api/v1/devices/{id}/metrics
///
/// Record a metric report. The payload is merged into the device's
/// attributes (percentages clamped to 0-100), and the report itself is
/// proof of life: the device is marked `online` and `last_seen` is set to
/// now, regardless of what the payload says.
pub async fn report_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut patch): Json<Attributes>,
) -> AppResult<impl IntoResponse> {
    entities::find_of_kind(&state, EntityKind::Device, &id).await?;

    patch.insert("status".to_string(), json!("online"));
    patch.insert("last_seen".to_string(), json!(chrono::Utc::now()));

    let device = state
        .store
        .update(&id, patch)
        .await
        .ok_or_else(|| AppError::not_found(EntityKind::Device.label(), &id))?;

    tracing::debug!(entity_id = %id, "Device metrics recorded");
    Ok(Json(DataResponse { data: device }))
}

/// GET /api/v1/devices/{id}/history
pub async fn device_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let history = entities::history_of_kind(&state, EntityKind::Device, &id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// DELETE /api/v1/devices/{id}
pub async fn delete_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    entities::delete_of_kind(&state, EntityKind::Device, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
