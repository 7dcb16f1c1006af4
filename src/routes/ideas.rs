// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin ingestion of curated ideas, guarded by `X-Admin-Key`.

use crate::db::run_blocking;
use crate::error::Result;
use crate::models::{Idea, IdeaContent, IdeaStatus};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use super::my_ideas::default_stage;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ideas", post(create_idea))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIdeaRequest {
    #[validate(length(min = 1, max = 80))]
    pub title: String,
    #[validate(length(min = 1, max = 160))]
    pub short_pitch: String,
    #[validate(length(min = 1, max = 40))]
    pub category: String,
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 10))]
    pub media_url: String,
    #[validate(length(max = 120))]
    pub one_liner: Option<String>,
    #[validate(length(max = 240))]
    pub problem: Option<String>,
    #[validate(length(max = 240))]
    pub solution: Option<String>,
    #[validate(length(max = 120))]
    pub audience: Option<String>,
    #[validate(length(max = 140))]
    pub differentiator: Option<String>,
    #[serde(default = "default_stage")]
    pub stage: String,
    pub links: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IdeaResponse {
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
    pub created_at: String,
}

impl From<Idea> for IdeaResponse {
    fn from(idea: Idea) -> Self {
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
            created_at: format_utc_rfc3339(idea.created_at),
        }
    }
}

/// Seed a published idea with no author.
async fn create_idea(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateIdeaRequest>,
) -> Result<Json<IdeaResponse>> {
    body.validate()?;

    let one_liner = body
        .one_liner
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| body.short_pitch.clone());
    let content = IdeaContent {
        title: body.title,
        short_pitch: body.short_pitch,
        category: body.category,
        tags: body.tags,
        media_url: body.media_url,
        one_liner,
        problem: body.problem,
        solution: body.solution,
        audience: body.audience,
        differentiator: body.differentiator,
        stage: body.stage,
        links: body.links.map(serde_json::Value::Object),
    };

    let idea = run_blocking(&state.db, move |db| {
        db.create_idea(&content, None, IdeaStatus::Published)
    })
    .await?;

    tracing::info!(idea_id = %idea.id, category = %idea.category, "Idea ingested");
    Ok(Json(idea.into()))
}
