//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use nethub_api::config::ServerConfig;
use nethub_api::router::build_app_router;
use nethub_api::state::AppState;
use nethub_jobs::{JobTracker, SimulatedExecutor, StageExecutor};
use nethub_registry::EntityStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and zero stage delay so job tests resolve quickly.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        history_cap: 1000,
        stale_after_secs: 300,
        stale_check_interval_secs: 30,
        stage_delay_ms: 0,
    }
}

/// Build the full application router backed by fresh in-memory state.
///
/// Uses [`build_app_router`], so tests exercise the same middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery) that production
/// uses. The staleness sweeper is not spawned; tests drive it directly
/// where needed.
pub fn build_test_app() -> Router {
    build_test_app_with_executor(Arc::new(SimulatedExecutor::new(Duration::ZERO)))
}

/// Same as [`build_test_app`] but with a caller-supplied stage executor,
/// for driving jobs into failure paths.
pub fn build_test_app_with_executor(executor: Arc<dyn StageExecutor>) -> Router {
    let config = test_config();
    let state = AppState {
        store: Arc::new(EntityStore::with_history_cap(config.history_cap)),
        jobs: Arc::new(JobTracker::new()),
        executor,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::PUT)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
