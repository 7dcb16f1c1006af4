// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application use-cases that sit between the HTTP layer and repositories.

use uuid::Uuid;

use crate::db::{DbError, DbResult, IdeaRepository, SwipeRepository, UserRepository};
use crate::models::{Idea, Swipe, SwipeDirection};

/// Find or create the user for a verified (provider, subject) pair.
pub fn login_with_subject<R: UserRepository + ?Sized>(
    users: &R,
    auth_provider: &str,
    auth_subject: &str,
) -> DbResult<Uuid> {
    let user = users.upsert_user_by_auth(auth_provider, auth_subject)?;
    tracing::info!(user_id = %user.id, auth_provider, "User logged in");
    Ok(user.id)
}

/// Next idea for the user's feed, if any.
pub fn get_next_idea<R: IdeaRepository + ?Sized>(
    ideas: &R,
    user_id: Uuid,
) -> DbResult<Option<Idea>> {
    ideas.next_idea_for_user(user_id)
}

#[derive(Debug, thiserror::Error)]
pub enum SwipeError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Validate and persist a swipe. Validation happens before any storage
/// access.
pub fn record_swipe<R: SwipeRepository + ?Sized>(
    swipes: &R,
    user_id: Uuid,
    idea_id: Uuid,
    direction: &str,
    decision_time_ms: Option<i64>,
) -> Result<Swipe, SwipeError> {
    let direction: SwipeDirection = direction.parse().map_err(SwipeError::Invalid)?;
    if decision_time_ms.is_some_and(|ms| ms < 0) {
        return Err(SwipeError::Invalid(
            "decision_time_ms must be >= 0".to_string(),
        ));
    }

    let swipe = swipes.create_swipe(user_id, idea_id, direction, decision_time_ms)?;
    tracing::debug!(
        user_id = %user_id,
        idea_id = %idea_id,
        direction = direction.as_str(),
        "Swipe recorded"
    );
    Ok(swipe)
}
