// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY;
use rusqlite::Row;
use uuid::Uuid;

use super::{is_constraint, parsed_col, timestamp_col, timestamp_now, uuid_col, SqliteDb};
use crate::db::{check_reorder, DbError, DbResult, IdeaMediaRepository};
use crate::models::{IdeaMedia, MediaType};

const MEDIA_COLUMNS: &str = "id, idea_id, media_type, s3_key, position, created_at";

impl IdeaMediaRepository for SqliteDb {
    fn add_media(
        &self,
        idea_id: Uuid,
        media_type: MediaType,
        s3_key: &str,
    ) -> DbResult<IdeaMedia> {
        self.with_conn(|conn| {
            // Position is computed inside the insert so concurrent
            // registrations cannot read the same maximum.
            let sql = format!(
                "INSERT INTO idea_media (id, idea_id, media_type, s3_key, position, created_at)
                 SELECT ?1, ?2, ?3, ?4,
                        COALESCE((SELECT MAX(position) FROM idea_media WHERE idea_id = ?2), -1) + 1,
                        ?5
                 RETURNING {MEDIA_COLUMNS}"
            );
            let media = conn.query_row(
                &sql,
                (
                    Uuid::new_v4().to_string(),
                    idea_id.to_string(),
                    media_type.as_str(),
                    s3_key,
                    timestamp_now(),
                ),
                map_media,
            )
            .map_err(|e| {
                if is_constraint(&e, SQLITE_CONSTRAINT_FOREIGNKEY) {
                    DbError::NotFound("Idea not found".to_string())
                } else {
                    DbError::from(e)
                }
            })?;
            Ok(media)
        })
    }

    fn list_media(&self, idea_id: Uuid) -> DbResult<Vec<IdeaMedia>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {MEDIA_COLUMNS} FROM idea_media
                 WHERE idea_id = ?1
                 ORDER BY position, created_at"
            );
            let mut stmt = conn.prepare(&sql)?;
            let media = stmt
                .query_map([idea_id.to_string()], map_media)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(media)
        })
    }

    fn delete_media(&self, media_id: Uuid, idea_id: Uuid) -> DbResult<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM idea_media WHERE id = ?1 AND idea_id = ?2",
                [media_id.to_string(), idea_id.to_string()],
            )?;
            Ok(deleted > 0)
        })
    }

    fn reorder_media(&self, idea_id: Uuid, media_ids: &[Uuid]) -> DbResult<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut select = tx.prepare("SELECT id FROM idea_media WHERE idea_id = ?1")?;
                let existing = select
                    .query_map([idea_id.to_string()], |row| uuid_col(row, 0))?
                    .collect::<Result<Vec<_>, _>>()?;
                // Dropping the transaction on error leaves positions untouched.
                check_reorder(&existing, media_ids)?;

                let mut stmt = tx.prepare(
                    "UPDATE idea_media SET position = ?1 WHERE id = ?2 AND idea_id = ?3",
                )?;
                for (position, media_id) in media_ids.iter().enumerate() {
                    stmt.execute((
                        position as i64,
                        media_id.to_string(),
                        idea_id.to_string(),
                    ))?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }
}

fn map_media(row: &Row<'_>) -> rusqlite::Result<IdeaMedia> {
    Ok(IdeaMedia {
        id: uuid_col(row, 0)?,
        idea_id: uuid_col(row, 1)?,
        media_type: parsed_col(row, 2)?,
        s3_key: row.get(3)?,
        position: row.get(4)?,
        created_at: timestamp_col(row, 5)?,
    })
}
