// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Forward-only schema migrations.
//!
//! Migrations are the files in `migrations/`, embedded at compile time and
//! applied in name order. Applied versions are recorded in
//! `schema_migrations`; each migration runs in its own transaction together
//! with its bookkeeping row.

use rusqlite::{Connection, OptionalExtension};

use crate::db::{DbError, DbResult};

/// (version, SQL) pairs in application order.
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_init.sql",
        include_str!("../../../migrations/0001_init.sql"),
    ),
    (
        "0002_idea_details.sql",
        include_str!("../../../migrations/0002_idea_details.sql"),
    ),
    (
        "0003_idea_authoring.sql",
        include_str!("../../../migrations/0003_idea_authoring.sql"),
    ),
];

/// Apply every migration not yet recorded. Returns the versions applied.
pub fn run(conn: &mut Connection) -> DbResult<Vec<String>> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     TEXT PRIMARY KEY,
            applied_at  TEXT NOT NULL
        );",
    )?;

    let mut applied = Vec::new();
    for (version, sql) in MIGRATIONS {
        let already: Option<String> = conn
            .query_row(
                "SELECT version FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .optional()?;
        if already.is_some() {
            continue;
        }

        tracing::info!(version, "Applying migration");

        let tx = conn.transaction()?;
        tx.execute_batch(sql).map_err(|e| DbError::Migration {
            version: version.to_string(),
            reason: e.to_string(),
        })?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            (version, super::timestamp_now()),
        )?;
        tx.commit()?;

        applied.push(version.to_string());
    }

    if applied.is_empty() {
        tracing::debug!("Database schema up to date");
    } else {
        tracing::info!(count = applied.len(), "Database migrations complete");
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_apply_once() {
        let mut conn = Connection::open_in_memory().unwrap();

        let first = run(&mut conn).unwrap();
        assert_eq!(first.len(), MIGRATIONS.len());

        let second = run(&mut conn).unwrap();
        assert!(second.is_empty());

        let recorded: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(recorded as usize, MIGRATIONS.len());
    }

    #[test]
    fn test_migrations_sorted_by_version() {
        let versions: Vec<&str> = MIGRATIONS.iter().map(|(v, _)| *v).collect();
        let mut sorted = versions.clone();
        sorted.sort();
        assert_eq!(versions, sorted);
    }

    #[test]
    fn test_schema_has_expected_columns() {
        let mut conn = Connection::open_in_memory().unwrap();
        run(&mut conn).unwrap();

        let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('ideas')").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        for expected in ["author_id", "status", "one_liner", "stage", "links"] {
            assert!(columns.iter().any(|c| c == expected), "missing {expected}");
        }
    }
}
