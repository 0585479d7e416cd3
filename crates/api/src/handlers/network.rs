//! Network-wide read endpoints: active alerts and the device overview.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use nethub_core::alert;
use nethub_core::entity::EntityKind;
use nethub_core::overview;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/alerts
///
/// Evaluate the alert rules against the current device set. Nothing is
/// stored; every call reflects the registry as of now.
pub async fn list_alerts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let devices = state.store.list(Some(EntityKind::Device)).await;
    let alerts = alert::evaluate(&devices);
    Ok(Json(DataResponse { data: alerts }))
}

/// GET /api/v1/overview
///
/// Aggregate device counts and averages for the whole network.
pub async fn network_overview(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let devices = state.store.list(Some(EntityKind::Device)).await;
    let overview = overview::summarize(&devices);
    Ok(Json(DataResponse { data: overview }))
}
