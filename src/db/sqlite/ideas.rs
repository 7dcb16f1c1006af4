// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::{
    json_col, opt_uuid_col, parsed_col, timestamp_col, timestamp_now, to_json, uuid_col, SqliteDb,
};
use crate::db::{DbResult, IdeaRepository};
use crate::models::{Idea, IdeaContent, IdeaStatus};

const IDEA_COLUMNS: &str = "id, author_id, status, title, short_pitch, category, tags, media_url, \
     one_liner, problem, solution, audience, differentiator, stage, links, created_at";

/// Same columns qualified with the `i` alias used by the feed query.
const IDEA_COLUMNS_I: &str = "i.id, i.author_id, i.status, i.title, i.short_pitch, i.category, \
     i.tags, i.media_url, i.one_liner, i.problem, i.solution, i.audience, i.differentiator, \
     i.stage, i.links, i.created_at";

impl IdeaRepository for SqliteDb {
    fn create_idea(
        &self,
        content: &IdeaContent,
        author_id: Option<Uuid>,
        status: IdeaStatus,
    ) -> DbResult<Idea> {
        let tags = to_json(&content.tags)?;
        let links = to_json(&content.links)?;
        self.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO ideas (
                    id, author_id, status, title, short_pitch, category, tags, media_url,
                    one_liner, problem, solution, audience, differentiator, stage, links, created_at
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                 RETURNING {IDEA_COLUMNS}"
            );
            let idea = conn.query_row(
                &sql,
                rusqlite::params![
                    Uuid::new_v4().to_string(),
                    author_id.map(|id| id.to_string()),
                    status.as_str(),
                    content.title,
                    content.short_pitch,
                    content.category,
                    tags,
                    content.media_url,
                    content.one_liner,
                    content.problem,
                    content.solution,
                    content.audience,
                    content.differentiator,
                    content.stage,
                    links,
                    timestamp_now(),
                ],
                map_idea,
            )?;
            Ok(idea)
        })
    }

    fn get_idea(&self, idea_id: Uuid) -> DbResult<Option<Idea>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE id = ?1");
            Ok(conn
                .query_row(&sql, [idea_id.to_string()], map_idea)
                .optional()?)
        })
    }

    fn get_idea_for_author(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<Option<Idea>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {IDEA_COLUMNS} FROM ideas WHERE id = ?1 AND author_id = ?2");
            Ok(conn
                .query_row(
                    &sql,
                    [idea_id.to_string(), author_id.to_string()],
                    map_idea,
                )
                .optional()?)
        })
    }

    fn next_idea_for_user(&self, user_id: Uuid) -> DbResult<Option<Idea>> {
        self.with_conn(|conn| {
            // `IS NOT` keeps author-less (admin) ideas, unlike `!=` on NULL.
            let sql = format!(
                "SELECT {IDEA_COLUMNS_I}
                 FROM ideas i
                 WHERE i.status = 'published'
                   AND i.author_id IS NOT ?1
                   AND NOT EXISTS (
                     SELECT 1 FROM swipes s
                     WHERE s.user_id = ?1 AND s.idea_id = i.id
                   )
                 ORDER BY i.created_at DESC, i.rowid DESC
                 LIMIT 1"
            );
            Ok(conn
                .query_row(&sql, [user_id.to_string()], map_idea)
                .optional()?)
        })
    }

    fn list_ideas_by_author(&self, author_id: Uuid) -> DbResult<Vec<Idea>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {IDEA_COLUMNS} FROM ideas
                 WHERE author_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let ideas = stmt
                .query_map([author_id.to_string()], map_idea)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ideas)
        })
    }

    fn update_idea(
        &self,
        idea_id: Uuid,
        author_id: Uuid,
        content: &IdeaContent,
        status: IdeaStatus,
    ) -> DbResult<Option<Idea>> {
        let tags = to_json(&content.tags)?;
        let links = to_json(&content.links)?;
        self.with_conn(|conn| {
            let sql = format!(
                "UPDATE ideas SET
                    title = ?1, short_pitch = ?2, category = ?3, tags = ?4, media_url = ?5,
                    one_liner = ?6, problem = ?7, solution = ?8, audience = ?9,
                    differentiator = ?10, stage = ?11, links = ?12, status = ?13
                 WHERE id = ?14 AND author_id = ?15
                 RETURNING {IDEA_COLUMNS}"
            );
            Ok(conn
                .query_row(
                    &sql,
                    rusqlite::params![
                        content.title,
                        content.short_pitch,
                        content.category,
                        tags,
                        content.media_url,
                        content.one_liner,
                        content.problem,
                        content.solution,
                        content.audience,
                        content.differentiator,
                        content.stage,
                        links,
                        status.as_str(),
                        idea_id.to_string(),
                        author_id.to_string(),
                    ],
                    map_idea,
                )
                .optional()?)
        })
    }

    fn delete_idea(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute(
                "DELETE FROM ideas WHERE id = ?1 AND author_id = ?2",
                [idea_id.to_string(), author_id.to_string()],
            )?;
            Ok(deleted > 0)
        })
    }

    fn publish_idea(&self, idea_id: Uuid, author_id: Uuid) -> DbResult<Option<Idea>> {
        self.with_conn(|conn| {
            let sql = format!(
                "UPDATE ideas SET status = 'published'
                 WHERE id = ?1 AND author_id = ?2
                 RETURNING {IDEA_COLUMNS}"
            );
            Ok(conn
                .query_row(
                    &sql,
                    [idea_id.to_string(), author_id.to_string()],
                    map_idea,
                )
                .optional()?)
        })
    }
}

fn map_idea(row: &Row<'_>) -> rusqlite::Result<Idea> {
    let short_pitch: String = row.get(4)?;
    let one_liner: String = row.get(8)?;
    Ok(Idea {
        id: uuid_col(row, 0)?,
        author_id: opt_uuid_col(row, 1)?,
        status: parsed_col(row, 2)?,
        title: row.get(3)?,
        category: row.get(5)?,
        tags: json_col(row, 6)?,
        media_url: row.get(7)?,
        // Rows created before one_liner existed carry the empty default.
        one_liner: if one_liner.is_empty() {
            short_pitch.clone()
        } else {
            one_liner
        },
        short_pitch,
        problem: row.get(9)?,
        solution: row.get(10)?,
        audience: row.get(11)?,
        differentiator: row.get(12)?,
        stage: row.get(13)?,
        links: json_col(row, 14)?,
        created_at: timestamp_col(row, 15)?,
    })
}
