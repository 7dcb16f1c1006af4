// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swipe statistics, computed from swipe rows on every request.

use crate::db::{run_blocking, DbResult};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{AuthorRollup, IdeaStats};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats/me", get(my_swipe_stats))
        .route("/stats/my-ideas", get(my_ideas_stats))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryStatResponse {
    pub category: String,
    pub total: u32,
    pub vibes: u32,
    pub no_vibes: u32,
    pub vibe_rate: f64,
}

/// What the user has swiped.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserStatsResponse {
    pub total_swipes: u32,
    pub total_vibes: u32,
    pub total_no_vibes: u32,
    pub vibe_rate: f64,
    pub by_category: Vec<CategoryStatResponse>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IdeaStatResponse {
    pub idea_id: String,
    pub title: String,
    pub total_views: u32,
    pub total_vibes: u32,
    pub total_no_vibes: u32,
    pub vibe_rate: f64,
}

/// How the user's own ideas are doing.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MyIdeasStatsResponse {
    pub ideas: Vec<IdeaStatResponse>,
    pub total_views: u32,
    pub total_vibes: u32,
}

async fn my_swipe_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<UserStatsResponse>> {
    let stats = run_blocking(&state.db, move |db| db.user_swipe_stats(auth.user_id)).await?;

    Ok(Json(UserStatsResponse {
        total_swipes: stats.totals.total,
        total_vibes: stats.totals.vibes,
        total_no_vibes: stats.totals.no_vibes,
        vibe_rate: stats.totals.vibe_rate(),
        by_category: stats
            .by_category
            .into_iter()
            .map(|c| CategoryStatResponse {
                vibe_rate: c.counts.vibe_rate(),
                category: c.category,
                total: c.counts.total,
                vibes: c.counts.vibes,
                no_vibes: c.counts.no_vibes,
            })
            .collect(),
    }))
}

async fn my_ideas_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MyIdeasStatsResponse>> {
    // Every authored idea is listed, drafts included.
    let rows = run_blocking(&state.db, move |db| {
        db.list_ideas_by_author(auth.user_id)?
            .into_iter()
            .map(|idea| Ok((idea.title, db.idea_swipe_stats(idea.id)?)))
            .collect::<DbResult<Vec<(String, IdeaStats)>>>()
    })
    .await?;

    let rollup = AuthorRollup::from_ideas(rows.iter().map(|(_, stats)| stats));
    let ideas = rows
        .into_iter()
        .map(|(title, stats)| IdeaStatResponse {
            idea_id: stats.idea_id.to_string(),
            title,
            total_views: stats.total_views(),
            total_vibes: stats.counts.vibes,
            total_no_vibes: stats.counts.no_vibes,
            vibe_rate: stats.counts.vibe_rate(),
        })
        .collect();

    Ok(Json(MyIdeasStatsResponse {
        ideas,
        total_views: rollup.total_views,
        total_vibes: rollup.total_vibes,
    }))
}
