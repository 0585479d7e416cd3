//! Route definitions for the network-wide read endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::network;
use crate::state::AppState;

/// Flat routes merged into `/api/v1`.
///
/// ```text
/// GET /alerts      -> list_alerts
/// GET /overview    -> network_overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(network::list_alerts))
        .route("/overview", get(network::network_overview))
}
