pub mod configs;
pub mod devices;
pub mod health;
pub mod jobs;
pub mod network;
pub mod repositories;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /devices                  list, register (GET, POST)
/// /devices/{id}             get, delete (GET, DELETE)
/// /devices/{id}/metrics     report metrics (POST)
/// /devices/{id}/history     change history (GET)
///
/// /configs                  list, create (GET, POST)
/// /configs/{id}             get, update, delete (GET, PUT, DELETE)
/// /configs/{id}/history     change history (GET)
/// /configs/{id}/deploy      deploy to a device (POST, 202)
///
/// /repositories             list, add (GET, POST)
/// /repositories/{id}        get (GET)
/// /repositories/{id}/sync   sync with remote (POST, 202)
///
/// /jobs                     list, submit (GET, POST)
/// /jobs/{id}                get (GET)
///
/// /alerts                   active alerts (GET)
/// /overview                 network overview (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Device registry and metric ingestion.
        .nest("/devices", devices::router())
        // Network configs and deployments.
        .nest("/configs", configs::router())
        // Automation repositories and syncs.
        .nest("/repositories", repositories::router())
        // Background job tracking.
        .nest("/jobs", jobs::router())
        // Network-wide alerts and overview.
        .merge(network::router())
}
