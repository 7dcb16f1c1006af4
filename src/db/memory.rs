// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory repositories for tests.
//!
//! Mirrors the SQLite semantics (uniqueness, author scoping, cascade on
//! idea deletion, feed ordering) without touching disk.

use chrono::Utc;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::db::{
    check_reorder, DbError, DbResult, IdeaMediaRepository, IdeaRepository, SwipeRepository,
    UserRepository,
};
use crate::models::{
    CategoryStats, Idea, IdeaContent, IdeaMedia, IdeaStats, IdeaStatus, MediaType, Swipe,
    SwipeCounts, SwipeDirection, User, UserProfile, UserSwipeStats,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    /// Insertion order doubles as the rowid tie-break.
    ideas: Vec<Idea>,
    media: Vec<IdeaMedia>,
    swipes: Vec<Swipe>,
}

#[derive(Default)]
pub struct MemoryDb {
    tables: Mutex<Tables>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|e| DbError::Pool(format!("memory store lock poisoned: {e}")))
    }
}

fn user_not_found() -> DbError {
    DbError::NotFound("User not found".to_string())
}

impl UserRepository for MemoryDb {
    fn get_user(&self, user_id: Uuid) -> DbResult<Option<User>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn upsert_user_by_auth(&self, auth_provider: &str, auth_subject: &str) -> DbResult<User> {
        let mut tables = self.lock()?;
        if let Some(user) = tables
            .users
            .iter()
            .find(|u| u.auth_provider == auth_provider && u.auth_subject == auth_subject)
        {
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4(),
            auth_provider: auth_provider.to_string(),
            auth_subject: auth_subject.to_string(),
            display_name: None,
            about: None,
            avatar_url: None,
            interests: None,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    fn update_interests(
        &self,
        user_id: Uuid,
        interests: Option<serde_json::Value>,
    ) -> DbResult<User> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(user_not_found)?;
        user.interests = interests;
        Ok(user.clone())
    }

    fn update_profile(&self, user_id: Uuid, profile: &UserProfile) -> DbResult<User> {
        let mut tables = self.lock()?;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(user_not_found)?;
        user.display_name = profile.display_name.clone();
        user.about = profile.about.clone();
        user.avatar_url = profile.avatar_url.clone();
        Ok(user.clone())
    }
}

fn apply_content(idea: &mut Idea, content: &IdeaContent) {
    idea.title = content.title.clone();
    idea.short_pitch = content.short_pitch.clone();
    idea.category = content.category.clone();
    idea.tags = content.tags.clone();
    idea.media_url = content.media_url.clone();
    idea.one_liner = if content.one_liner.is_empty() {
        content.short_pitch.clone()
    } else {
        content.one_liner.clone()
    };
    idea.problem = content.problem.clone();
    idea.solution = content.solution.clone();
    idea.audience = content.audience.clone();
    idea.differentiator = content.differentiator.clone();
    idea.stage = content.stage.clone();
    idea.links = content.links.clone();
}

fn owned_by(idea: &Idea, idea_id: Uuid, author_id: Uuid) -> bool {
    idea.id == idea_id && idea.author_id == Some(author_id)
}

impl IdeaRepository for MemoryDb {
    fn create_idea(
        &self,
        content: &IdeaContent,
        author_id: Option<Uuid>,
        status: IdeaStatus,
    ) -> DbResult<Idea> {
        let mut idea = Idea {
            id: Uuid::new_v4(),
            author_id,
            status,
            title: String::new(),
            short_pitch: String::new(),
            category: String::new(),
            tags: None,
            media_url: String::new(),
            one_liner: String::new(),
            problem: None,
            solution: None,
            audience: None,
            differentiator: None,
            stage: String::new(),
            links: None,
            created_at: Utc::now(),
        };
        apply_content(&mut idea, content);
        self.lock()?.ideas.push(idea.clone());
        Ok(idea)
    }

    fn get_idea(&self, idea_id: Uuid) -> DbResult<Option<Idea>> {
        Ok(self.lock()?.ideas.iter().find(|i| i.id == idea_id).cloned())
    }

    fn get_idea_for_author(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<Option<Idea>> {
        Ok(self
            .lock()?
            .ideas
            .iter()
            .find(|i| owned_by(i, idea_id, author_id))
            .cloned())
    }

    fn next_idea_for_user(&self, user_id: Uuid) -> DbResult<Option<Idea>> {
        let tables = self.lock()?;
        // max_by_key keeps the last maximum, so later inserts win ties.
        Ok(tables
            .ideas
            .iter()
            .filter(|i| i.is_feed_eligible_for(user_id))
            .filter(|i| {
                !tables
                    .swipes
                    .iter()
                    .any(|s| s.user_id == user_id && s.idea_id == i.id)
            })
            .max_by_key(|i| i.created_at)
            .cloned())
    }

    fn list_ideas_by_author(&self, author_id: Uuid) -> DbResult<Vec<Idea>> {
        let mut ideas: Vec<Idea> = self
            .lock()?
            .ideas
            .iter()
            .rev()
            .filter(|i| i.author_id == Some(author_id))
            .cloned()
            .collect();
        // Stable sort keeps the reversed insertion order for equal timestamps.
        ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ideas)
    }

    fn update_idea(
        &self,
        idea_id: Uuid,
        author_id: Uuid,
        content: &IdeaContent,
        status: IdeaStatus,
    ) -> DbResult<Option<Idea>> {
        let mut tables = self.lock()?;
        Ok(tables
            .ideas
            .iter_mut()
            .find(|i| owned_by(i, idea_id, author_id))
            .map(|idea| {
                apply_content(idea, content);
                idea.status = status;
                idea.clone()
            }))
    }

    fn delete_idea(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<bool> {
        let mut tables = self.lock()?;
        let before = tables.ideas.len();
        tables.ideas.retain(|i| !owned_by(i, idea_id, author_id));
        if tables.ideas.len() == before {
            return Ok(false);
        }
        tables.swipes.retain(|s| s.idea_id != idea_id);
        tables.media.retain(|m| m.idea_id != idea_id);
        Ok(true)
    }

    fn publish_idea(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<Option<Idea>> {
        let mut tables = self.lock()?;
        Ok(tables
            .ideas
            .iter_mut()
            .find(|i| owned_by(i, idea_id, author_id))
            .map(|idea| {
                idea.status = IdeaStatus::Published;
                idea.clone()
            }))
    }
}

impl IdeaMediaRepository for MemoryDb {
    fn add_media(
        &self,
        idea_id: Uuid,
        media_type: MediaType,
        s3_key: &str,
    ) -> DbResult<IdeaMedia> {
        let mut tables = self.lock()?;
        if !tables.ideas.iter().any(|i| i.id == idea_id) {
            return Err(DbError::NotFound("Idea not found".to_string()));
        }
        let position = tables
            .media
            .iter()
            .filter(|m| m.idea_id == idea_id)
            .map(|m| m.position)
            .max()
            .map_or(0, |max| max + 1);
        let media = IdeaMedia {
            id: Uuid::new_v4(),
            idea_id,
            media_type,
            s3_key: s3_key.to_string(),
            position,
            created_at: Utc::now(),
        };
        tables.media.push(media.clone());
        Ok(media)
    }

    fn list_media(&self, idea_id: Uuid) -> DbResult<Vec<IdeaMedia>> {
        let mut media: Vec<IdeaMedia> = self
            .lock()?
            .media
            .iter()
            .filter(|m| m.idea_id == idea_id)
            .cloned()
            .collect();
        media.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(media)
    }

    fn delete_media(&self, media_id: Uuid, idea_id: Uuid) -> DbResult<bool> {
        let mut tables = self.lock()?;
        let before = tables.media.len();
        tables
            .media
            .retain(|m| !(m.id == media_id && m.idea_id == idea_id));
        Ok(tables.media.len() != before)
    }

    fn reorder_media(&self, idea_id: Uuid, media_ids: &[Uuid]) -> DbResult<()> {
        let mut tables = self.lock()?;
        let existing: Vec<Uuid> = tables
            .media
            .iter()
            .filter(|m| m.idea_id == idea_id)
            .map(|m| m.id)
            .collect();
        check_reorder(&existing, media_ids)?;
        for (position, media_id) in media_ids.iter().enumerate() {
            if let Some(m) = tables.media.iter_mut().find(|m| m.id == *media_id) {
                m.position = position as i64;
            }
        }
        Ok(())
    }
}

impl SwipeRepository for MemoryDb {
    fn create_swipe(
        &self,
        user_id: Uuid,
        idea_id: Uuid,
        direction: SwipeDirection,
        decision_time_ms: Option<i64>,
    ) -> DbResult<Swipe> {
        let mut tables = self.lock()?;
        if !tables.ideas.iter().any(|i| i.id == idea_id) {
            return Err(DbError::NotFound("Idea not found".to_string()));
        }
        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(DbError::NotFound("User not found".to_string()));
        }
        if tables
            .swipes
            .iter()
            .any(|s| s.user_id == user_id && s.idea_id == idea_id)
        {
            return Err(DbError::DuplicateSwipe);
        }
        let swipe = Swipe {
            id: Uuid::new_v4(),
            user_id,
            idea_id,
            direction,
            decision_time_ms,
            created_at: Utc::now(),
        };
        tables.swipes.push(swipe.clone());
        Ok(swipe)
    }

    fn user_swipe_stats(&self, user_id: Uuid) -> DbResult<UserSwipeStats> {
        let tables = self.lock()?;
        let mut stats = UserSwipeStats::default();
        for swipe in tables.swipes.iter().filter(|s| s.user_id == user_id) {
            stats.totals.record(swipe.direction);
            let Some(idea) = tables.ideas.iter().find(|i| i.id == swipe.idea_id) else {
                continue;
            };
            match stats
                .by_category
                .iter_mut()
                .find(|c| c.category == idea.category)
            {
                Some(entry) => entry.counts.record(swipe.direction),
                None => {
                    let mut counts = SwipeCounts::default();
                    counts.record(swipe.direction);
                    stats.by_category.push(CategoryStats {
                        category: idea.category.clone(),
                        counts,
                    });
                }
            }
        }
        stats.sort_categories();
        Ok(stats)
    }

    fn idea_swipe_stats(&self, idea_id: Uuid) -> DbResult<IdeaStats> {
        let tables = self.lock()?;
        let mut counts = SwipeCounts::default();
        for swipe in tables.swipes.iter().filter(|s| s.idea_id == idea_id) {
            counts.record(swipe.direction);
        }
        Ok(IdeaStats { idea_id, counts })
    }
}
