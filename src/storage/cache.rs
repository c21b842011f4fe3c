//! Per-call access to the fact cache.

use crate::error::Result;
use crate::storage::{MemoryStore, SqliteMemoryStore};
use std::path::{Path, PathBuf};

/// Handle to the fact cache database file.
///
/// Holds only the path. Each [`with_store`](Self::with_store) call opens a
/// fresh connection, ensures the schema exists, runs the closure, and drops
/// the connection before returning, on success and failure alike.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    path: PathBuf,
}

impl MemoryCache {
    /// Creates a handle for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the database path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against an open, initialized store.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized, or
    /// whatever error `f` returns.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut SqliteMemoryStore) -> Result<T>) -> Result<T> {
        let mut store = SqliteMemoryStore::open(&self.path)?;
        store.init()?;
        tracing::trace!(path = %self.path.display(), "fact cache opened");
        f(&mut store)
    }
}
