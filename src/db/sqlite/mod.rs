// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SQLite-backed repositories.
//!
//! Connections come from an r2d2 pool created at start-up. Acquiring a
//! connection blocks the calling (blocking-pool) thread for at most
//! [`ACQUIRE_TIMEOUT`], so repository methods must only be called from
//! `spawn_blocking`.

mod idea_media;
mod ideas;
pub mod migrations;
mod swipes;
mod users;

use chrono::{DateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use crate::db::{DbError, DbResult};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Longest a caller waits for a free pooled connection.
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// SQLite database with a bounded connection pool.
pub struct SqliteDb {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteDb {
    /// Open (or create) a database file with `pool_size` connections and
    /// apply pending migrations.
    pub fn open(path: &Path, pool_size: usize) -> DbResult<Self> {
        if path.as_os_str() == ":memory:" {
            return Self::open_in_memory();
        }

        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            // WAL mode for concurrent reads
            conn.pragma_update(None, "journal_mode", "WAL")?;
            configure(conn)
        });
        let db = Self::with_manager(manager, pool_size, ACQUIRE_TIMEOUT)?;

        tracing::info!(path = %path.display(), pool_size, "SQLite database opened");
        Ok(db)
    }

    /// Ephemeral database for tests. The pool holds a single connection so
    /// writers never contend on the shared in-memory cache.
    pub fn open_in_memory() -> DbResult<Self> {
        let manager = SqliteConnectionManager::memory().with_init(|conn| configure(conn));
        Self::with_manager(manager, 1, ACQUIRE_TIMEOUT)
    }

    fn with_manager(
        manager: SqliteConnectionManager,
        pool_size: usize,
        acquire_timeout: Duration,
    ) -> DbResult<Self> {
        let max_size = u32::try_from(pool_size.max(1)).unwrap_or(u32::MAX);
        let pool = Pool::builder()
            .max_size(max_size)
            .connection_timeout(acquire_timeout)
            .build(manager)
            .map_err(pool_error)?;

        let db = Self { pool };
        db.with_conn(|conn| migrations::run(conn).map(|_| ()))?;
        Ok(db)
    }

    fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.pool.get().map_err(pool_error)?;
        f(&mut conn)
    }
}

fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.busy_timeout(BUSY_TIMEOUT)
}

fn pool_error(err: r2d2::Error) -> DbError {
    DbError::Pool(err.to_string())
}

// ─── Column Helpers ──────────────────────────────────────────

/// Timestamps are stored as fixed-width RFC3339 strings so that text order
/// is chronological order.
pub(crate) fn timestamp_now() -> String {
    crate::time_utils::format_db_timestamp(Utc::now())
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

pub(crate) fn opt_uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| Uuid::parse_str(&s).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn timestamp_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

pub(crate) fn json_col<T: serde::de::DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| serde_json::from_str(&s).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

pub(crate) fn parsed_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e: String| conversion_error(idx, std::io::Error::other(e)))
}

pub(crate) fn to_json<T: serde::Serialize>(value: &Option<T>) -> DbResult<Option<String>> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(DbError::from)
}

/// Whether `err` is a SQLite constraint violation with the given extended code.
pub(crate) fn is_constraint(err: &rusqlite::Error, code: std::ffi::c_int) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == code
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_times_out_when_pool_exhausted() {
        let manager = SqliteConnectionManager::memory().with_init(|conn| configure(conn));
        let db = SqliteDb::with_manager(manager, 1, Duration::from_millis(50)).unwrap();

        let held = db.pool.get().unwrap();
        let err = db.with_conn(|_| Ok(())).unwrap_err();
        assert!(matches!(err, DbError::Pool(_)));

        drop(held);
        assert!(db.with_conn(|_| Ok(())).is_ok());
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let db = SqliteDb::open_in_memory().unwrap();
        let enabled: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_pool_reuses_connections() {
        let db = SqliteDb::open_in_memory().unwrap();

        for _ in 0..3 {
            let count: i64 = db
                .with_conn(|conn| {
                    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
                })
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn test_file_database_shares_state_across_pool() {
        let path = std::env::temp_dir().join(format!("vibecheck-{}.db", Uuid::new_v4()));
        let db = SqliteDb::open(&path, 3).unwrap();

        // Hold two connections so the third acquisition gets a different one.
        let first = db.pool.get().unwrap();
        let second = db.pool.get().unwrap();
        first
            .execute(
                "INSERT INTO users (id, auth_provider, auth_subject, created_at)
                 VALUES (?1, 'google', 'abc', ?2)",
                (Uuid::new_v4().to_string(), timestamp_now()),
            )
            .unwrap();
        let count: i64 = second
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);

        drop(first);
        drop(second);
        drop(db);
        let _ = std::fs::remove_file(&path);
    }
}
