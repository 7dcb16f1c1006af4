// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User identity record, keyed by (auth_provider, auth_subject).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Identity provider name (e.g. "google")
    pub auth_provider: String,
    /// Subject claim issued by the provider
    pub auth_subject: String,
    pub display_name: Option<String>,
    /// Short bio
    pub about: Option<String>,
    /// Avatar object key, or an absolute URL
    pub avatar_url: Option<String>,
    /// Free-form interests structure chosen by the client
    pub interests: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Editable profile fields. Every field is written as given, so `None`
/// clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub display_name: Option<String>,
    pub about: Option<String>,
    pub avatar_url: Option<String>,
}
