//! Route definitions for the `/devices` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::devices;
use crate::state::AppState;

/// Routes mounted at `/devices`.
///
/// ```text
/// GET    /               -> list_devices
/// POST   /               -> register_device
/// GET    /{id}           -> get_device
/// DELETE /{id}           -> delete_device
/// POST   /{id}/metrics   -> report_metrics
/// GET    /{id}/history   -> device_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(devices::list_devices).post(devices::register_device))
        .route(
            "/{id}",
            get(devices::get_device).delete(devices::delete_device),
        )
        .route("/{id}/metrics", post(devices::report_metrics))
        .route("/{id}/history", get(devices::device_history))
}
