//! Handlers for the `/repositories` resource, including sync submission.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use nethub_core::entity::{Attributes, EntityKind};
use nethub_jobs::{run_job, stage_sequence, JobStatus, StageContext, SYNC_STAGES};

use crate::error::AppResult;
use crate::handlers::entities;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/repositories
///
/// Register an automation repository. Requires `name` and `url`; branch
/// defaults to `main` and `last_sync` starts null until the first
/// successful sync.
pub async fn add_repository(
    State(state): State<AppState>,
    Json(attributes): Json<Attributes>,
) -> AppResult<impl IntoResponse> {
    let repository = entities::create(&state, EntityKind::Repository, attributes).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: repository })))
}

/// GET /api/v1/repositories
pub async fn list_repositories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let repositories = entities::list_of_kind(&state, EntityKind::Repository).await;
    Ok(Json(DataResponse { data: repositories }))
}

/// GET /api/v1/repositories/{id}
pub async fn get_repository(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let repository = entities::find_of_kind(&state, EntityKind::Repository, &id).await?;
    Ok(Json(DataResponse { data: repository }))
}

/// POST /api/v1/repositories/{id}/sync
///
/// Submit a background sync job (pull, parse, validate) and return it
/// with `202 Accepted`. `last_sync` is stamped only if the job succeeds.
pub async fn sync_repository(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let repository = entities::find_of_kind(&state, EntityKind::Repository, &id).await?;

    let job = state.jobs.submit(&id).await;
    let ctx = StageContext {
        job_id: job.id.clone(),
        entity_id: id.clone(),
        params: json!({
            "url": repository.attributes.get("url").cloned().unwrap_or(Value::Null),
            "branch": repository.attributes.get("branch").cloned().unwrap_or(Value::Null),
        }),
    };

    let store = Arc::clone(&state.store);
    let tracker = Arc::clone(&state.jobs);
    let executor = Arc::clone(&state.executor);
    let repository_id = id.clone();
    tokio::spawn(async move {
        let status = run_job(tracker, executor, stage_sequence(SYNC_STAGES), ctx).await;
        // Only a successful sync counts as contact with the remote.
        if status == JobStatus::Success {
            let stamped = store
                .update_with(&repository_id, |attrs| {
                    attrs.insert("last_sync".to_string(), json!(chrono::Utc::now()));
                })
                .await;
            if stamped.is_none() {
                tracing::warn!(
                    entity_id = %repository_id,
                    "Repository removed while its sync was running"
                );
            }
        }
    });

    tracing::info!(job_id = %job.id, entity_id = %id, "Sync job submitted");
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: job })))
}
