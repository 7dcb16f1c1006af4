// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current-user profile routes.

use crate::db::run_blocking;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{User, UserProfile};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/interests", put(update_interests))
        .route("/me/profile", put(update_profile))
        .route("/me/avatar/upload-url", post(create_avatar_upload_url))
}

/// Current user response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub id: Uuid,
    pub auth_provider: String,
    pub created_at: String,
    pub interests: Option<serde_json::Value>,
    pub display_name: Option<String>,
    pub about: Option<String>,
    /// Presigned download URL for stored avatars; absolute URLs pass through.
    pub avatar_url: Option<String>,
}

impl MeResponse {
    async fn from_user(state: &AppState, user: User) -> Self {
        let avatar_url = match user.avatar_url {
            Some(url) if url.starts_with("http") => Some(url),
            Some(key) => Some(super::display_url(state, &key).await),
            None => None,
        };

        Self {
            id: user.id,
            auth_provider: user.auth_provider,
            created_at: format_utc_rfc3339(user.created_at),
            interests: user.interests,
            display_name: user.display_name,
            about: user.about,
            avatar_url,
        }
    }
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let user = run_blocking(&state.db, move |db| db.get_user(auth.user_id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse::from_user(&state, user).await))
}

#[derive(Debug, Deserialize)]
pub struct UpdateInterestsRequest {
    pub interests: Option<serde_json::Map<String, serde_json::Value>>,
}

async fn update_interests(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateInterestsRequest>,
) -> Result<Json<MeResponse>> {
    let interests = body.interests.map(serde_json::Value::Object);
    let user = run_blocking(&state.db, move |db| {
        db.update_interests(auth.user_id, interests)
    })
    .await?;

    Ok(Json(MeResponse::from_user(&state, user).await))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 80))]
    pub display_name: Option<String>,
    #[validate(length(max = 500))]
    pub about: Option<String>,
    pub avatar_url: Option<String>,
}

/// Replace all profile fields; omitted fields are cleared.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<MeResponse>> {
    body.validate()?;

    let profile = UserProfile {
        display_name: body.display_name,
        about: body.about,
        avatar_url: body.avatar_url,
    };
    let user = run_blocking(&state.db, move |db| {
        db.update_profile(auth.user_id, &profile)
    })
    .await?;

    tracing::info!(user_id = %auth.user_id, "Profile updated");
    Ok(Json(MeResponse::from_user(&state, user).await))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadUrlRequest {
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
}

/// Presigned PUT plus the headers the client must send with it.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UploadUrlResponse {
    pub object_key: String,
    pub upload_url: String,
    pub headers: BTreeMap<String, String>,
}

impl From<crate::services::PresignedPut> for UploadUrlResponse {
    fn from(put: crate::services::PresignedPut) -> Self {
        Self {
            object_key: put.object_key,
            upload_url: put.upload_url,
            headers: put.headers,
        }
    }
}

async fn create_avatar_upload_url(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<UploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>> {
    body.validate()?;

    let presigner = state.presigner.as_ref().ok_or_else(super::storage_unavailable)?;
    let put = presigner
        .presign_avatar_upload(auth.user_id, &body.content_type)
        .await?;

    tracing::debug!(
        user_id = %auth.user_id,
        object_key = %put.object_key,
        "Avatar upload URL issued"
    );
    Ok(Json(put.into()))
}
