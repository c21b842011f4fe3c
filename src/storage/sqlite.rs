//! `SQLite` storage implementation.
//!
//! Provides the persistent fact cache using `SQLite`.

// SQLite returns counts as i64; they are never negative.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use crate::core::{MemoryMetadata, MemoryRecord};
use crate::error::{Result, StorageError};
use crate::storage::schema::{
    CURRENT_SCHEMA_VERSION, GET_VERSION_SQL, INSERT_MEMORY_SQL, RECENT_MEMORIES_SQL, SCHEMA_SQL,
    SEARCH_MEMORIES_SQL, SET_VERSION_SQL,
};
use crate::storage::traits::{MemoryStore, StorageStats};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};

/// SQLite-based fact cache.
///
/// # Examples
///
/// ```no_run
/// use engram_rs::storage::{MemoryStore, SqliteMemoryStore};
///
/// let mut store = SqliteMemoryStore::open("memory.db").unwrap();
/// store.init().unwrap();
/// ```
pub struct SqliteMemoryStore {
    /// `SQLite` connection.
    conn: Connection,
    /// Path to the database file (None for in-memory).
    path: Option<PathBuf>,
}

impl SqliteMemoryStore {
    /// Opens or creates a `SQLite` database at the given path.
    ///
    /// Creates the parent directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or database cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::DirectoryFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(&path).map_err(StorageError::from)?;

        // WAL keeps readers from blocking the single writer (returns result, use query_row)
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    /// Creates an in-memory `SQLite` database.
    ///
    /// Useful for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        Ok(Self { conn, path: None })
    }

    /// Returns the database path (None for in-memory).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Gets the current schema version.
    fn get_schema_version(&self) -> Result<Option<u32>> {
        let version: Option<String> = self
            .conn
            .query_row(GET_VERSION_SQL, [], |row| row.get(0))
            .optional()
            .map_err(StorageError::from)?;

        Ok(version.and_then(|v| v.parse().ok()))
    }

    /// Sets the schema version.
    fn set_schema_version(&self, version: u32) -> Result<()> {
        self.conn
            .execute(SET_VERSION_SQL, params![version.to_string()])
            .map_err(StorageError::from)?;
        Ok(())
    }

    /// Returns the current time as an RFC 3339 string.
    fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<MemoryRecord> {
        Ok(MemoryRecord {
            id: Some(row.get(0)?),
            content: row.get(1)?,
            metadata: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

/// Builds a `LIKE` pattern matching `query` anywhere, with wildcards escaped.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

impl MemoryStore for SqliteMemoryStore {
    fn init(&mut self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .map_err(StorageError::from)?;

        match self.get_schema_version()? {
            None => self.set_schema_version(CURRENT_SCHEMA_VERSION)?,
            Some(v) if v > CURRENT_SCHEMA_VERSION => {
                return Err(StorageError::Migration(format!(
                    "database schema v{v} is newer than supported v{CURRENT_SCHEMA_VERSION}"
                ))
                .into());
            }
            Some(_) => {}
        }

        Ok(())
    }

    fn remember(&mut self, content: &str, metadata: &MemoryMetadata) -> Result<i64> {
        let metadata = serde_json::to_string(metadata).map_err(StorageError::from)?;

        self.conn
            .execute(INSERT_MEMORY_SQL, params![content, metadata, Self::now()])
            .map_err(StorageError::from)?;

        Ok(self.conn.last_insert_rowid())
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let mut stmt = self
            .conn
            .prepare(SEARCH_MEMORIES_SQL)
            .map_err(StorageError::from)?;

        let records = stmt
            .query_map(
                params![like_pattern(query), sql_limit(limit)],
                Self::row_to_record,
            )
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(records)
    }

    fn recent(&self, limit: usize) -> Result<Vec<MemoryRecord>> {
        let mut stmt = self
            .conn
            .prepare(RECENT_MEMORIES_SQL)
            .map_err(StorageError::from)?;

        let records = stmt
            .query_map(params![sql_limit(limit)], Self::row_to_record)
            .map_err(StorageError::from)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StorageError::from)?;

        Ok(records)
    }

    fn stats(&self) -> Result<StorageStats> {
        let memory_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memories", [], |row| row.get(0))
            .map_err(StorageError::from)?;

        let latest: Option<String> = self
            .conn
            .query_row(
                "SELECT created_at FROM memories ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(StorageError::from)?;

        let db_size = self
            .path
            .as_ref()
            .and_then(|p| std::fs::metadata(p).ok())
            .map(|m| m.len());

        Ok(StorageStats {
            memory_count: memory_count as usize,
            latest,
            schema_version: self.get_schema_version()?.unwrap_or(0),
            db_size,
        })
    }
}
