//! Route definitions for the `/repositories` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::repositories;
use crate::state::AppState;

/// Routes mounted at `/repositories`.
///
/// ```text
/// GET    /             -> list_repositories
/// POST   /             -> add_repository
/// GET    /{id}         -> get_repository
/// POST   /{id}/sync    -> sync_repository (202)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(repositories::list_repositories).post(repositories::add_repository),
        )
        .route("/{id}", get(repositories::get_repository))
        .route("/{id}/sync", post(repositories::sync_repository))
}
