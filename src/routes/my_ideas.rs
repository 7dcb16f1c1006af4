// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authoring routes: a user's own ideas and their media.
//!
//! Every route is scoped to the authenticated author. An idea that exists
//! but belongs to someone else is reported exactly like a missing one.

use crate::db::{run_blocking, DbError, DbResult, Store};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Idea, IdeaContent, IdeaMedia, IdeaStatus, MediaType};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use super::me::UploadUrlResponse;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me/ideas", get(list_my_ideas).post(create_my_idea))
        .route(
            "/me/ideas/{idea_id}",
            get(get_my_idea).put(update_my_idea).delete(delete_my_idea),
        )
        .route("/me/ideas/{idea_id}/publish", post(publish_my_idea))
        .route(
            "/me/ideas/{idea_id}/media/upload-url",
            post(create_media_upload_url),
        )
        .route("/me/ideas/{idea_id}/media", post(register_media))
        .route("/me/ideas/{idea_id}/media/order", put(reorder_media))
        .route(
            "/me/ideas/{idea_id}/media/{media_id}",
            delete(delete_media),
        )
}

// ─── Responses ───────────────────────────────────────────────

/// One attachment, with a download URL in place of the storage key.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MediaResponse {
    pub id: String,
    pub media_type: MediaType,
    pub url: String,
    pub position: i64,
}

impl MediaResponse {
    pub(crate) async fn from_media(state: &AppState, media: IdeaMedia) -> Self {
        Self {
            id: media.id.to_string(),
            media_type: media.media_type,
            url: super::display_url(state, &media.s3_key).await,
            position: media.position,
        }
    }

    pub(crate) async fn list(state: &AppState, media: Vec<IdeaMedia>) -> Vec<Self> {
        let mut out = Vec::with_capacity(media.len());
        for m in media {
            out.push(Self::from_media(state, m).await);
        }
        out
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MyIdeaResponse {
    pub id: String,
    pub title: String,
    pub short_pitch: String,
    pub category: String,
    pub tags: Option<Vec<String>>,
    pub media_url: String,
    pub one_liner: String,
    pub problem: Option<String>,
    pub solution: Option<String>,
    pub audience: Option<String>,
    pub differentiator: Option<String>,
    pub stage: String,
    pub links: Option<serde_json::Value>,
    pub status: IdeaStatus,
    pub created_at: String,
    pub media: Vec<MediaResponse>,
}

impl MyIdeaResponse {
    async fn new(state: &AppState, idea: Idea, media: Vec<IdeaMedia>) -> Self {
        let media = MediaResponse::list(state, media).await;
        Self {
            id: idea.id.to_string(),
            title: idea.title,
            short_pitch: idea.short_pitch,
            category: idea.category,
            tags: idea.tags,
            media_url: idea.media_url,
            one_liner: idea.one_liner,
            problem: idea.problem,
            solution: idea.solution,
            audience: idea.audience,
            differentiator: idea.differentiator,
            stage: idea.stage,
            links: idea.links,
            status: idea.status,
            created_at: format_utc_rfc3339(idea.created_at),
            media,
        }
    }
}

// ─── Requests ────────────────────────────────────────────────

/// Body for both create and full update.
#[derive(Debug, Deserialize, Validate)]
pub struct MyIdeaRequest {
    #[validate(length(min = 1, max = 80))]
    pub title: String,
    #[validate(length(min = 1, max = 160))]
    pub short_pitch: String,
    #[validate(length(min = 1, max = 40))]
    pub category: String,
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub media_url: String,
    #[validate(length(max = 120))]
    pub one_liner: Option<String>,
    #[validate(length(max = 500))]
    pub problem: Option<String>,
    #[validate(length(max = 500))]
    pub solution: Option<String>,
    #[validate(length(max = 200))]
    pub audience: Option<String>,
    #[validate(length(max = 200))]
    pub differentiator: Option<String>,
    #[serde(default = "default_stage")]
    pub stage: String,
    pub links: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub status: IdeaStatus,
}

pub(crate) fn default_stage() -> String {
    "idea".to_string()
}

impl MyIdeaRequest {
    fn into_parts(self) -> (IdeaContent, IdeaStatus) {
        let one_liner = self
            .one_liner
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.short_pitch.clone());
        let content = IdeaContent {
            title: self.title,
            short_pitch: self.short_pitch,
            category: self.category,
            tags: self.tags,
            media_url: self.media_url,
            one_liner,
            problem: self.problem,
            solution: self.solution,
            audience: self.audience,
            differentiator: self.differentiator,
            stage: self.stage,
            links: self.links.map(serde_json::Value::Object),
        };
        (content, self.status)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct MediaUploadUrlRequest {
    #[validate(length(min = 1, max = 100))]
    pub content_type: String,
    #[serde(default)]
    pub media_type: MediaType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterMediaRequest {
    #[validate(length(min = 1, max = 1024))]
    pub s3_key: String,
    #[serde(default)]
    pub media_type: MediaType,
}

#[derive(Debug, Deserialize)]
pub struct ReorderMediaRequest {
    pub media_ids: Vec<Uuid>,
}

// ─── Handlers ────────────────────────────────────────────────

fn idea_not_found() -> DbError {
    DbError::NotFound("Idea not found".to_string())
}

/// The idea if `author_id` owns it, otherwise not-found.
fn owned_idea(db: &dyn Store, idea_id: Uuid, author_id: Uuid) -> DbResult<Idea> {
    db.get_idea_for_author(idea_id, author_id)?
        .ok_or_else(idea_not_found)
}

fn with_media(db: &dyn Store, idea: Idea) -> DbResult<(Idea, Vec<IdeaMedia>)> {
    let media = db.list_media(idea.id)?;
    Ok((idea, media))
}

async fn list_my_ideas(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<MyIdeaResponse>>> {
    let rows = run_blocking(&state.db, move |db| {
        db.list_ideas_by_author(auth.user_id)?
            .into_iter()
            .map(|idea| with_media(db, idea))
            .collect::<DbResult<Vec<_>>>()
    })
    .await?;

    let mut ideas = Vec::with_capacity(rows.len());
    for (idea, media) in rows {
        ideas.push(MyIdeaResponse::new(&state, idea, media).await);
    }
    Ok(Json(ideas))
}

async fn create_my_idea(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<MyIdeaRequest>,
) -> Result<(StatusCode, Json<MyIdeaResponse>)> {
    body.validate()?;

    let (content, status) = body.into_parts();
    let idea = run_blocking(&state.db, move |db| {
        db.create_idea(&content, Some(auth.user_id), status)
    })
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        idea_id = %idea.id,
        status = %idea.status,
        "Idea created"
    );
    Ok((
        StatusCode::CREATED,
        Json(MyIdeaResponse::new(&state, idea, Vec::new()).await),
    ))
}

async fn get_my_idea(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<MyIdeaResponse>> {
    let (idea, media) = run_blocking(&state.db, move |db| {
        with_media(db, owned_idea(db, idea_id, auth.user_id)?)
    })
    .await?;

    Ok(Json(MyIdeaResponse::new(&state, idea, media).await))
}

async fn update_my_idea(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(idea_id): Path<Uuid>,
    Json(body): Json<MyIdeaRequest>,
) -> Result<Json<MyIdeaResponse>> {
    body.validate()?;

    let (content, status) = body.into_parts();
    let (idea, media) = run_blocking(&state.db, move |db| {
        let idea = db
            .update_idea(idea_id, auth.user_id, &content, status)?
            .ok_or_else(idea_not_found)?;
        with_media(db, idea)
    })
    .await?;

    tracing::info!(user_id = %auth.user_id, idea_id = %idea_id, "Idea updated");
    Ok(Json(MyIdeaResponse::new(&state, idea, media).await))
}

async fn delete_my_idea(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(idea_id): Path<Uuid>,
) -> Result<StatusCode> {
    let deleted =
        run_blocking(&state.db, move |db| db.delete_idea(idea_id, auth.user_id)).await?;
    if !deleted {
        return Err(AppError::NotFound("Idea not found".to_string()));
    }

    tracing::info!(user_id = %auth.user_id, idea_id = %idea_id, "Idea deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn publish_my_idea(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(idea_id): Path<Uuid>,
) -> Result<Json<MyIdeaResponse>> {
    let (idea, media) = run_blocking(&state.db, move |db| {
        let idea = db
            .publish_idea(idea_id, auth.user_id)?
            .ok_or_else(idea_not_found)?;
        with_media(db, idea)
    })
    .await?;

    tracing::info!(user_id = %auth.user_id, idea_id = %idea_id, "Idea published");
    Ok(Json(MyIdeaResponse::new(&state, idea, media).await))
}

// ─── Media ───────────────────────────────────────────────────

async fn create_media_upload_url(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(idea_id): Path<Uuid>,
    Json(body): Json<MediaUploadUrlRequest>,
) -> Result<Json<UploadUrlResponse>> {
    body.validate()?;

    run_blocking(&state.db, move |db| owned_idea(db, idea_id, auth.user_id)).await?;

    let presigner = state
        .presigner
        .as_ref()
        .ok_or_else(super::storage_unavailable)?;
    let put = presigner
        .presign_media_upload(idea_id, &body.content_type)
        .await?;

    tracing::debug!(
        idea_id = %idea_id,
        object_key = %put.object_key,
        media_type = body.media_type.as_str(),
        "Media upload URL issued"
    );
    Ok(Json(put.into()))
}

/// Record an uploaded object as the idea's last attachment.
async fn register_media(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(idea_id): Path<Uuid>,
    Json(body): Json<RegisterMediaRequest>,
) -> Result<(StatusCode, Json<MediaResponse>)> {
    body.validate()?;

    let media = run_blocking(&state.db, move |db| {
        owned_idea(db, idea_id, auth.user_id)?;
        db.add_media(idea_id, body.media_type, &body.s3_key)
    })
    .await?;

    tracing::info!(
        idea_id = %idea_id,
        media_id = %media.id,
        position = media.position,
        "Media registered"
    );
    Ok((
        StatusCode::CREATED,
        Json(MediaResponse::from_media(&state, media).await),
    ))
}

/// Rewrite media positions in the given order. All ids must belong to the
/// idea; otherwise nothing changes.
async fn reorder_media(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(idea_id): Path<Uuid>,
    Json(body): Json<ReorderMediaRequest>,
) -> Result<StatusCode> {
    run_blocking(&state.db, move |db| {
        owned_idea(db, idea_id, auth.user_id)?;
        db.reorder_media(idea_id, &body.media_ids)
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn delete_media(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path((idea_id, media_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    let deleted = run_blocking(&state.db, move |db| {
        owned_idea(db, idea_id, auth.user_id)?;
        db.delete_media(media_id, idea_id)
    })
    .await?;
    if !deleted {
        return Err(AppError::NotFound("Media not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
