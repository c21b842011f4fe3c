//! Database schema definitions.
//!
//! Contains the SQL schema for the Engram fact cache.

/// Current schema version.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// SQL schema for initial database setup.
pub const SCHEMA_SQL: &str = r"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_info (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Remembered facts (append-only)
CREATE TABLE IF NOT EXISTS memories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}',  -- JSON object
    created_at TEXT NOT NULL              -- RFC 3339
);
";

/// SQL to get schema version.
pub const GET_VERSION_SQL: &str = r"
SELECT value FROM schema_info WHERE key = 'version';
";

/// SQL to set schema version.
pub const SET_VERSION_SQL: &str = r"
INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?);
";

/// SQL to insert a memory.
pub const INSERT_MEMORY_SQL: &str = r"
INSERT INTO memories (content, metadata, created_at) VALUES (?, ?, ?);
";

/// SQL for substring search, newest first. `\` escapes LIKE wildcards.
pub const SEARCH_MEMORIES_SQL: &str = r"
SELECT id, content, metadata, created_at FROM memories
WHERE content LIKE ? ESCAPE '\'
ORDER BY id DESC
LIMIT ?;
";

/// SQL for the most recent memories, newest first.
pub const RECENT_MEMORIES_SQL: &str = r"
SELECT id, content, metadata, created_at FROM memories
ORDER BY id DESC
LIMIT ?;
";
