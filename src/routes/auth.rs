// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login: exchange a provider ID token for a session token.

use crate::db::run_blocking;
use crate::error::{AppError, Result};
use crate::services::login_with_subject;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub provider: String,
    #[validate(length(min = 16))]
    pub id_token: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub user_id: String,
    pub access_token: String,
    pub token_type: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    body.validate()?;

    let verifier = state
        .oidc_verifier
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("OIDC is not configured".to_string()))?;

    if let Some(expected) = state.config.oidc_provider.as_deref() {
        if body.provider != expected {
            return Err(AppError::BadRequest("Unsupported provider".to_string()));
        }
    }

    let claims = verifier
        .verify_id_token(&body.id_token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, provider = %body.provider, "Rejected ID token");
            AppError::InvalidToken
        })?;

    let subject = claims.sub.filter(|s| !s.is_empty()).ok_or_else(|| {
        tracing::warn!(provider = %body.provider, "ID token has no subject");
        AppError::InvalidToken
    })?;

    let provider = body.provider.clone();
    let user_id = run_blocking(&state.db, move |db| {
        login_with_subject(db, &provider, &subject)
    })
    .await?;

    let access_token = state
        .tokens
        .issue(&user_id.to_string())
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(LoginResponse {
        user_id: user_id.to_string(),
        access_token,
        token_type: "bearer".to_string(),
    }))
}
