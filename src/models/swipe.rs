// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Swipe decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Direction of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeDirection {
    Vibe,
    NoVibe,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Vibe => "vibe",
            SwipeDirection::NoVibe => "no_vibe",
        }
    }
}

impl FromStr for SwipeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vibe" => Ok(SwipeDirection::Vibe),
            "no_vibe" => Ok(SwipeDirection::NoVibe),
            _ => Err("Invalid swipe direction".to_string()),
        }
    }
}

/// One user's immutable decision on one idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub idea_id: Uuid,
    pub direction: SwipeDirection,
    /// Time the user took to decide, in milliseconds
    pub decision_time_ms: Option<i64>,
    pub created_at: DateTime<Utc>,
}
