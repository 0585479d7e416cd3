//! Route definitions for the `/configs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::configs;
use crate::state::AppState;

/// Routes mounted at `/configs`.
///
/// ```text
/// GET    /               -> list_configs
/// POST   /               -> create_config
/// GET    /{id}           -> get_config
/// PUT    /{id}           -> update_config
/// DELETE /{id}           -> delete_config
/// GET    /{id}/history   -> config_history
/// POST   /{id}/deploy    -> deploy_config (202)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(configs::list_configs).post(configs::create_config))
        .route(
            "/{id}",
            get(configs::get_config)
                .put(configs::update_config)
                .delete(configs::delete_config),
        )
        .route("/{id}/history", get(configs::config_history))
        .route("/{id}/deploy", post(configs::deploy_config))
}
