// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{json_col, timestamp_col, timestamp_now, to_json, uuid_col, SqliteDb};
use crate::db::{DbError, DbResult, UserRepository};
use crate::models::{User, UserProfile};

const USER_COLUMNS: &str =
    "id, auth_provider, auth_subject, display_name, about, avatar_url, interests, created_at";

impl UserRepository for SqliteDb {
    fn get_user(&self, user_id: Uuid) -> DbResult<Option<User>> {
        self.with_conn(|conn| query_user(conn, user_id))
    }

    fn upsert_user_by_auth(&self, auth_provider: &str, auth_subject: &str) -> DbResult<User> {
        self.with_conn(|conn| {
            // The no-op update makes RETURNING yield the existing row on conflict.
            let sql = format!(
                "INSERT INTO users (id, auth_provider, auth_subject, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (auth_provider, auth_subject)
                 DO UPDATE SET auth_subject = excluded.auth_subject
                 RETURNING {USER_COLUMNS}"
            );
            let user = conn.query_row(
                &sql,
                (
                    Uuid::new_v4().to_string(),
                    auth_provider,
                    auth_subject,
                    timestamp_now(),
                ),
                map_user,
            )?;
            Ok(user)
        })
    }

    fn update_interests(
        &self,
        user_id: Uuid,
        interests: Option<serde_json::Value>,
    ) -> DbResult<User> {
        let interests = to_json(&interests)?;
        self.with_conn(|conn| {
            let sql = format!(
                "UPDATE users SET interests = ?1 WHERE id = ?2 RETURNING {USER_COLUMNS}"
            );
            conn.query_row(&sql, (interests, user_id.to_string()), map_user)
                .optional()?
                .ok_or_else(|| DbError::NotFound("User not found".to_string()))
        })
    }

    fn update_profile(&self, user_id: Uuid, profile: &UserProfile) -> DbResult<User> {
        self.with_conn(|conn| {
            let sql = format!(
                "UPDATE users SET display_name = ?1, about = ?2, avatar_url = ?3
                 WHERE id = ?4
                 RETURNING {USER_COLUMNS}"
            );
            conn.query_row(
                &sql,
                (
                    &profile.display_name,
                    &profile.about,
                    &profile.avatar_url,
                    user_id.to_string(),
                ),
                map_user,
            )
            .optional()?
            .ok_or_else(|| DbError::NotFound("User not found".to_string()))
        })
    }
}

fn query_user(conn: &Connection, user_id: Uuid) -> DbResult<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    let user = conn
        .query_row(&sql, [user_id.to_string()], map_user)
        .optional()?;
    Ok(user)
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_col(row, 0)?,
        auth_provider: row.get(1)?,
        auth_subject: row.get(2)?,
        display_name: row.get(3)?,
        about: row.get(4)?,
        avatar_url: row.get(5)?,
        interests: json_col(row, 6)?,
        created_at: timestamp_col(row, 7)?,
    })
}
