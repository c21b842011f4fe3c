//! Storage trait definition.
//!
//! Defines the interface for the fact cache backend.

use crate::core::{MemoryMetadata, MemoryRecord};
use crate::error::Result;
use serde::Serialize;

/// Trait for persistent fact storage.
///
/// The store is append-only: records are inserted and read, never updated
/// or deleted.
pub trait MemoryStore {
    /// Initializes storage (creates schema).
    ///
    /// Should be idempotent - safe to call multiple times.
    ///
    /// # Errors
    ///
    /// Returns an error if schema creation fails.
    fn init(&mut self) -> Result<()>;

    /// Appends a fact with its metadata.
    ///
    /// Returns the assigned record ID.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    fn remember(&mut self, content: &str, metadata: &MemoryMetadata) -> Result<i64>;

    /// Returns up to `limit` records whose fact text contains `query`,
    /// newest first. Matching is case-insensitive for ASCII.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn search(&self, query: &str, limit: usize) -> Result<Vec<MemoryRecord>>;

    /// Returns the `limit` most recently inserted records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn recent(&self, limit: usize) -> Result<Vec<MemoryRecord>>;

    /// Gets storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if statistics cannot be gathered.
    fn stats(&self) -> Result<StorageStats>;
}

/// Storage statistics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StorageStats {
    /// Number of stored memories.
    pub memory_count: usize,
    /// Timestamp of the newest memory, if any.
    pub latest: Option<String>,
    /// Schema version.
    pub schema_version: u32,
    /// Database file size in bytes (if applicable).
    pub db_size: Option<u64>,
}
