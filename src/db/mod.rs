// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Each entity has a repository trait. `SqliteDb` implements all of them
//! against SQLite; `MemoryDb` is an in-process fake with the same
//! semantics for tests. Handlers hold an `Arc<dyn Store>` and run
//! repository calls on the blocking pool via [`run_blocking`].

pub mod memory;
pub mod sqlite;

pub use memory::MemoryDb;
pub use sqlite::SqliteDb;

use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    Idea, IdeaContent, IdeaMedia, IdeaStats, IdeaStatus, MediaType, Swipe, SwipeDirection, User,
    UserProfile, UserSwipeStats,
};

/// Repository-level failures.
///
/// `NotFound`, `InvalidInput` and `DuplicateSwipe` are expected outcomes
/// that the HTTP layer maps to specific status codes; everything else is a
/// storage failure.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("{0}")]
    NotFound(String),

    /// The request is well-formed but inconsistent with stored data.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Swipe already recorded")]
    DuplicateSwipe,

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON column error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Migration {version} failed: {reason}")]
    Migration { version: String, reason: String },
}

pub type DbResult<T> = Result<T, DbError>;

// ─── Repositories ────────────────────────────────────────────

pub trait UserRepository {
    fn get_user(&self, user_id: Uuid) -> DbResult<Option<User>>;

    /// Find or create the user for (provider, subject). Existing profile
    /// fields are never touched.
    fn upsert_user_by_auth(&self, auth_provider: &str, auth_subject: &str) -> DbResult<User>;

    /// Fails with `NotFound` if the user does not exist.
    fn update_interests(
        &self,
        user_id: Uuid,
        interests: Option<serde_json::Value>,
    ) -> DbResult<User>;

    /// Fails with `NotFound` if the user does not exist.
    fn update_profile(&self, user_id: Uuid, profile: &UserProfile) -> DbResult<User>;
}

pub trait IdeaRepository {
    fn create_idea(
        &self,
        content: &IdeaContent,
        author_id: Option<Uuid>,
        status: IdeaStatus,
    ) -> DbResult<Idea>;

    fn get_idea(&self, idea_id: Uuid) -> DbResult<Option<Idea>>;

    /// The idea, only if `author_id` wrote it. Absence and foreign ownership
    /// both yield `None`.
    fn get_idea_for_author(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<Option<Idea>>;

    /// Newest published idea not written by and not yet swiped by `user_id`.
    fn next_idea_for_user(&self, user_id: Uuid) -> DbResult<Option<Idea>>;

    /// Newest first.
    fn list_ideas_by_author(&self, author_id: Uuid) -> DbResult<Vec<Idea>>;

    fn update_idea(
        &self,
        idea_id: Uuid,
        author_id: Uuid,
        content: &IdeaContent,
        status: IdeaStatus,
    ) -> DbResult<Option<Idea>>;

    /// Returns whether a row was deleted.
    fn delete_idea(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<bool>;

    fn publish_idea(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<Option<Idea>>;
}

pub trait IdeaMediaRepository {
    /// Append media to an idea at position max(position) + 1.
    fn add_media(&self, idea_id: Uuid, media_type: MediaType, s3_key: &str)
        -> DbResult<IdeaMedia>;

    /// Ordered by position.
    fn list_media(&self, idea_id: Uuid) -> DbResult<Vec<IdeaMedia>>;

    fn delete_media(&self, media_id: Uuid, idea_id: Uuid) -> DbResult<bool>;

    /// Rewrite positions so `media_ids[i]` gets position `i`.
    ///
    /// `media_ids` must list every media item of the idea exactly once. An
    /// id that does not belong to the idea fails with `NotFound`; a
    /// duplicate or a missing item fails with `InvalidInput`. On any
    /// failure positions are unchanged.
    fn reorder_media(&self, idea_id: Uuid, media_ids: &[Uuid]) -> DbResult<()>;
}

pub trait SwipeRepository {
    /// Fails with `DuplicateSwipe` if the user already swiped the idea and
    /// with `NotFound` if the idea does not exist.
    fn create_swipe(
        &self,
        user_id: Uuid,
        idea_id: Uuid,
        direction: SwipeDirection,
        decision_time_ms: Option<i64>,
    ) -> DbResult<Swipe>;

    fn user_swipe_stats(&self, user_id: Uuid) -> DbResult<UserSwipeStats>;

    fn idea_swipe_stats(&self, idea_id: Uuid) -> DbResult<IdeaStats>;
}

/// Check a requested media order against the idea's current media ids.
pub(crate) fn check_reorder(existing: &[Uuid], media_ids: &[Uuid]) -> DbResult<()> {
    if let Some(unknown) = media_ids.iter().find(|id| !existing.contains(*id)) {
        return Err(DbError::NotFound(format!("Media {unknown} not found")));
    }

    let mut seen = HashSet::with_capacity(media_ids.len());
    if let Some(dup) = media_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(DbError::InvalidInput(format!(
            "Media {dup} listed more than once"
        )));
    }

    if media_ids.len() != existing.len() {
        return Err(DbError::InvalidInput(format!(
            "Order must list all {} media items, got {}",
            existing.len(),
            media_ids.len()
        )));
    }
    Ok(())
}

/// Everything the HTTP layer needs from storage.
pub trait Store:
    UserRepository + IdeaRepository + IdeaMediaRepository + SwipeRepository + Send + Sync + 'static
{
}

impl<T> Store for T where
    T: UserRepository
        + IdeaRepository
        + IdeaMediaRepository
        + SwipeRepository
        + Send
        + Sync
        + 'static
{
}

/// Run repository work on the blocking thread pool.
pub async fn run_blocking<T, E, F>(db: &Arc<dyn Store>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&dyn Store) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<AppError> + Send + 'static,
{
    let db = Arc::clone(db);
    tokio::task::spawn_blocking(move || f(db.as_ref()))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("blocking task failed: {e}")))?
        .map_err(Into::into)
}
