// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use rusqlite::ffi::{SQLITE_CONSTRAINT_FOREIGNKEY, SQLITE_CONSTRAINT_UNIQUE};
use rusqlite::{Connection, Row};
use uuid::Uuid;

use super::{is_constraint, parsed_col, timestamp_col, timestamp_now, uuid_col, SqliteDb};
use crate::db::{DbError, DbResult, SwipeRepository};
use crate::models::{
    CategoryStats, IdeaStats, Swipe, SwipeCounts, SwipeDirection, UserSwipeStats,
};

const COUNT_COLUMNS: &str = "COUNT(*),
     COALESCE(SUM(CASE WHEN s.direction = 'vibe' THEN 1 ELSE 0 END), 0),
     COALESCE(SUM(CASE WHEN s.direction = 'no_vibe' THEN 1 ELSE 0 END), 0)";

impl SwipeRepository for SqliteDb {
    fn create_swipe(
        &self,
        user_id: Uuid,
        idea_id: Uuid,
        direction: SwipeDirection,
        decision_time_ms: Option<i64>,
    ) -> DbResult<Swipe> {
        self.with_conn(|conn| {
            let inserted = conn.query_row(
                "INSERT INTO swipes (id, user_id, idea_id, direction, decision_time_ms, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, user_id, idea_id, direction, decision_time_ms, created_at",
                (
                    Uuid::new_v4().to_string(),
                    user_id.to_string(),
                    idea_id.to_string(),
                    direction.as_str(),
                    decision_time_ms,
                    timestamp_now(),
                ),
                map_swipe,
            );
            match inserted {
                Ok(swipe) => Ok(swipe),
                Err(e) if is_constraint(&e, SQLITE_CONSTRAINT_UNIQUE) => {
                    Err(DbError::DuplicateSwipe)
                }
                Err(e) if is_constraint(&e, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                    Err(missing_reference(conn, idea_id)?)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn user_swipe_stats(&self, user_id: Uuid) -> DbResult<UserSwipeStats> {
        self.with_conn(|conn| {
            let totals = conn.query_row(
                &format!("SELECT {COUNT_COLUMNS} FROM swipes s WHERE s.user_id = ?1"),
                [user_id.to_string()],
                |row| map_counts(row, 0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT i.category, {COUNT_COLUMNS}
                 FROM swipes s
                 JOIN ideas i ON i.id = s.idea_id
                 WHERE s.user_id = ?1
                 GROUP BY i.category"
            ))?;
            let by_category = stmt
                .query_map([user_id.to_string()], |row| {
                    Ok(CategoryStats {
                        category: row.get(0)?,
                        counts: map_counts(row, 1)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            let mut stats = UserSwipeStats {
                totals,
                by_category,
            };
            stats.sort_categories();
            Ok(stats)
        })
    }

    fn idea_swipe_stats(&self, idea_id: Uuid) -> DbResult<IdeaStats> {
        self.with_conn(|conn| {
            let counts = conn.query_row(
                &format!("SELECT {COUNT_COLUMNS} FROM swipes s WHERE s.idea_id = ?1"),
                [idea_id.to_string()],
                |row| map_counts(row, 0),
            )?;
            Ok(IdeaStats { idea_id, counts })
        })
    }
}

/// SQLite does not say which foreign key failed; a missing idea takes
/// precedence, otherwise the swiping user is gone.
fn missing_reference(conn: &Connection, idea_id: Uuid) -> DbResult<DbError> {
    let idea_exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM ideas WHERE id = ?1)",
        [idea_id.to_string()],
        |row| row.get(0),
    )?;
    let what = if idea_exists { "User" } else { "Idea" };
    Ok(DbError::NotFound(format!("{what} not found")))
}

fn map_counts(row: &Row<'_>, start: usize) -> rusqlite::Result<SwipeCounts> {
    Ok(SwipeCounts {
        total: row.get(start)?,
        vibes: row.get(start + 1)?,
        no_vibes: row.get(start + 2)?,
    })
}

fn map_swipe(row: &Row<'_>) -> rusqlite::Result<Swipe> {
    Ok(Swipe {
        id: uuid_col(row, 0)?,
        user_id: uuid_col(row, 1)?,
        idea_id: uuid_col(row, 2)?,
        direction: parsed_col(row, 3)?,
        decision_time_ms: row.get(4)?,
        created_at: timestamp_col(row, 5)?,
    })
}
