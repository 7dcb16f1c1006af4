// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared-secret guard for admin ingestion routes.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Require `X-Admin-Key` to match the configured admin key.
///
/// Answers 403 both when admin ingestion is disabled (no key configured) and
/// when the presented key is missing or wrong.
pub async fn require_admin_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.admin_api_key.as_deref() else {
        return Err(AppError::Forbidden("Admin ingestion is disabled".to_string()));
    };

    let presented = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !keys_match(presented, expected) {
        tracing::warn!("Rejected admin request with invalid key");
        return Err(AppError::Forbidden("Invalid admin key".to_string()));
    }

    Ok(next.run(request).await)
}

fn keys_match(presented: &str, expected: &str) -> bool {
    !presented.is_empty() && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}
