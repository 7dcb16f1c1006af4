// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use vibecheck_api::db::DbError;
use vibecheck_api::error::AppError;

async fn render(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_db_errors_map_to_statuses() {
    let (status, body) = render(DbError::NotFound("Idea not found".to_string()).into()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "not_found", "details": "Idea not found"}));

    let (status, body) = render(DbError::DuplicateSwipe.into()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"], "Swipe already recorded");

    let (status, body) =
        render(DbError::InvalidInput("Media listed more than once".to_string()).into()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = render(DbError::Pool("exhausted".to_string()).into()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "database_error"}));
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let (status, body) = render(AppError::Internal(anyhow::anyhow!("secret path /var/db"))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "internal_error"}));
}

#[tokio::test]
async fn test_auth_errors_have_no_details() {
    let (status, body) = render(AppError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "unauthorized"}));

    let (status, body) = render(AppError::Forbidden("Invalid admin key".to_string())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"], "Invalid admin key");
}
