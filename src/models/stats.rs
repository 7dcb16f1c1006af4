// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swipe statistics aggregates.
//!
//! Nothing here is persisted: repositories count swipe rows on every
//! request and these types only carry the counts and derive rates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::SwipeDirection;

/// Swipe counts for some slice of swipes (a user, a category, an idea).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwipeCounts {
    pub total: u32,
    pub vibes: u32,
    pub no_vibes: u32,
}

impl SwipeCounts {
    /// Count one swipe in the given direction.
    pub fn record(&mut self, direction: SwipeDirection) {
        self.total += 1;
        match direction {
            SwipeDirection::Vibe => self.vibes += 1,
            SwipeDirection::NoVibe => self.no_vibes += 1,
        }
    }

    /// Vibe percentage rounded to one decimal place; 0.0 with no swipes.
    pub fn vibe_rate(&self) -> f64 {
        vibe_rate(self.vibes, self.total)
    }
}

/// `100 * vibes / total` rounded to one decimal place, or 0.0 when `total` is 0.
pub fn vibe_rate(vibes: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = f64::from(vibes) / f64::from(total) * 100.0;
    (pct * 10.0).round() / 10.0
}

/// Per-category breakdown of a user's swipes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub counts: SwipeCounts,
}

/// Everything a user has swiped, overall and per idea category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSwipeStats {
    pub totals: SwipeCounts,
    /// Ordered by category total, largest first
    pub by_category: Vec<CategoryStats>,
}

impl UserSwipeStats {
    /// Sort categories by total descending, breaking ties by name so the
    /// order is stable across requests.
    pub fn sort_categories(&mut self) {
        self.by_category.sort_by(|a, b| {
            b.counts
                .total
                .cmp(&a.counts.total)
                .then_with(|| a.category.cmp(&b.category))
        });
    }
}

/// Swipes received by one idea. Every swipe counts as a view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdeaStats {
    pub idea_id: Uuid,
    pub counts: SwipeCounts,
}

impl IdeaStats {
    pub fn total_views(&self) -> u32 {
        self.counts.total
    }
}

/// Sum of views and vibes across all of an author's ideas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRollup {
    pub total_views: u32,
    pub total_vibes: u32,
}

impl AuthorRollup {
    pub fn from_ideas<'a>(stats: impl IntoIterator<Item = &'a IdeaStats>) -> Self {
        stats.into_iter().fold(Self::default(), |mut acc, s| {
            acc.total_views += s.counts.total;
            acc.total_vibes += s.counts.vibes;
            acc
        })
    }
}
