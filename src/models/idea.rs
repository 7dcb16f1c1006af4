// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Idea cards and their attached media.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Publication state of an idea. Only published ideas reach the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum IdeaStatus {
    #[default]
    Draft,
    Published,
}

impl IdeaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Draft => "draft",
            IdeaStatus::Published => "published",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(IdeaStatus::Draft),
            "published" => Ok(IdeaStatus::Published),
            other => Err(format!("unknown idea status: {other}")),
        }
    }
}

/// The descriptive fields of an idea, shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct IdeaContent {
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
    /// Free-text lifecycle tag ("idea", "mvp", ...)
    pub stage: String,
    pub links: Option<serde_json::Value>,
}

/// A pitch card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: Uuid,
    /// `None` for admin-seeded ideas
    pub author_id: Option<Uuid>,
    pub status: IdeaStatus,
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
    pub created_at: DateTime<Utc>,
}

impl Idea {
    /// Whether `user_id` may see this idea in their feed.
    pub fn is_feed_eligible_for(&self, user_id: Uuid) -> bool {
        self.status == IdeaStatus::Published && self.author_id != Some(user_id)
    }
}

/// Kind of media attached to an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// An ordered attachment belonging to exactly one idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaMedia {
    pub id: Uuid,
    pub idea_id: Uuid,
    pub media_type: MediaType,
    /// Object-storage key of the uploaded file
    pub s3_key: String,
    /// Zero-based display position
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea(author_id: Option<Uuid>, status: IdeaStatus) -> Idea {
        Idea {
            id: Uuid::new_v4(),
            author_id,
            status,
            title: "Title".to_string(),
            short_pitch: "Pitch".to_string(),
            category: "fintech".to_string(),
            tags: None,
            media_url: String::new(),
            one_liner: "Pitch".to_string(),
            problem: None,
            solution: None,
            audience: None,
            differentiator: None,
            stage: "idea".to_string(),
            links: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_feed_eligibility() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(idea(None, IdeaStatus::Published).is_feed_eligible_for(me));
        assert!(idea(Some(other), IdeaStatus::Published).is_feed_eligible_for(me));
        assert!(!idea(Some(me), IdeaStatus::Published).is_feed_eligible_for(me));
        assert!(!idea(Some(other), IdeaStatus::Draft).is_feed_eligible_for(me));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("draft".parse::<IdeaStatus>(), Ok(IdeaStatus::Draft));
        assert_eq!("published".parse::<IdeaStatus>(), Ok(IdeaStatus::Published));
        assert!("archived".parse::<IdeaStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&IdeaStatus::Published).unwrap(),
            "\"published\""
        );
    }
}
