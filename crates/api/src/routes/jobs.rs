//! Route definitions for the `/jobs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /        -> list_jobs
/// POST   /        -> submit_job (202)
/// GET    /{id}    -> get_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::submit_job))
        .route("/{id}", get(jobs::get_job))
}
