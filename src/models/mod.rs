// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod idea;
pub mod stats;
pub mod swipe;
pub mod user;

pub use idea::{Idea, IdeaContent, IdeaMedia, IdeaStatus, MediaType};
pub use stats::{AuthorRollup, CategoryStats, IdeaStats, SwipeCounts, UserSwipeStats};
pub use swipe::{Swipe, SwipeDirection};
pub use user::{User, UserProfile};
