//! Storage layer for Engram.
//!
//! Provides the persistent fact cache using `SQLite`. Callers normally go
//! through [`MemoryCache`], which opens the database for the duration of one
//! operation and closes it afterwards.

pub mod cache;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use cache::MemoryCache;
pub use schema::{CURRENT_SCHEMA_VERSION, SCHEMA_SQL};
pub use sqlite::SqliteMemoryStore;
pub use traits::{MemoryStore, StorageStats};

/// Default database file name.
pub const DEFAULT_DB_NAME: &str = "memory.db";

/// Default database path relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".engram/memory.db";
