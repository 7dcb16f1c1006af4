// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The swipe feed.

use crate::db::{run_blocking, DbError};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::services::get_next_idea;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::my_ideas::MediaResponse;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/feed/next", get(next_idea))
}

/// A feed card. Authoring metadata (status, author) is not exposed.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FeedIdeaResponse {
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
    pub media: Vec<MediaResponse>,
}

/// Next unseen idea, or `null` when the user has swiped everything.
async fn next_idea(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Option<FeedIdeaResponse>>> {
    let next = run_blocking(&state.db, move |db| {
        let Some(idea) = get_next_idea(db, auth.user_id)? else {
            return Ok::<_, DbError>(None);
        };
        let media = db.list_media(idea.id)?;
        Ok(Some((idea, media)))
    })
    .await?;

    let Some((idea, media)) = next else {
        tracing::debug!(user_id = %auth.user_id, "Feed exhausted");
        return Ok(Json(None));
    };

    Ok(Json(Some(FeedIdeaResponse {
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
        media: MediaResponse::list(&state, media).await,
    })))
}
