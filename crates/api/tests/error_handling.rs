//! Tests for the error-to-HTTP mapping.
//!
//! These call `IntoResponse` directly rather than going through a route, so
//! each variant's status code, error code, and message shape is pinned down
//! in one place.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;

use nethub_api::error::AppError;
use nethub_core::CoreError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_maps_to_404() {
    let (status, body) = error_to_response(AppError::not_found("Device", "abc123")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert_eq!(body["error"], "Device with id abc123 not found");
}

#[tokio::test]
async fn validation_maps_to_400() {
    let err = AppError::from(CoreError::Validation(
        "Missing required fields: name".to_string(),
    ));
    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Missing required fields: name");
}

#[tokio::test]
async fn invalid_state_maps_to_409() {
    let err = AppError::from(CoreError::InvalidState(
        "Job j1 cannot move from success to running".to_string(),
    ));
    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
    assert_eq!(body["error"], "Job j1 cannot move from success to running");
}

// ---------------------------------------------------------------------------
// API-layer errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_maps_to_400() {
    let (status, body) = error_to_response(AppError::BadRequest("malformed cursor".to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(body["error"], "malformed cursor");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let err = AppError::InternalError("db connection lost at 10.0.0.7".to_string());
    let (status, body) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "INTERNAL_ERROR");
    // The underlying detail must never reach the client.
    assert_eq!(body["error"], "An internal error occurred");
    assert!(!body.to_string().contains("10.0.0.7"));
}
