// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recording swipe decisions.

use crate::db::run_blocking;
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::Swipe;
use crate::services::record_swipe;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/swipes", post(create_swipe))
}

/// Direction stays a plain string so an unknown value is a 422 from the
/// swipe rules rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub idea_id: Uuid,
    pub direction: String,
    pub decision_time_ms: Option<i64>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SwipeResponse {
    pub id: String,
    pub user_id: String,
    pub idea_id: String,
    pub direction: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub decision_time_ms: Option<i64>,
    pub created_at: String,
}

impl From<Swipe> for SwipeResponse {
    fn from(swipe: Swipe) -> Self {
        Self {
            id: swipe.id.to_string(),
            user_id: swipe.user_id.to_string(),
            idea_id: swipe.idea_id.to_string(),
            direction: swipe.direction.as_str().to_string(),
            decision_time_ms: swipe.decision_time_ms,
            created_at: format_utc_rfc3339(swipe.created_at),
        }
    }
}

async fn create_swipe(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>> {
    let swipe = run_blocking(&state.db, move |db| {
        record_swipe(
            db,
            auth.user_id,
            body.idea_id,
            &body.direction,
            body.decision_time_ms,
        )
    })
    .await?;

    Ok(Json(swipe.into()))
}
