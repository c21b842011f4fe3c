//! Memory records for the local fact cache.
//!
//! A record is an append-only `(id, fact, metadata, timestamp)` tuple. The
//! metadata is stored as JSON text; records written by other tools may carry
//! arbitrary keys, so parsing is lenient.

use serde::{Deserialize, Serialize};

/// Metadata `type` used for facts stored through `remember_fact`.
pub const MANUAL_FACT: &str = "manual_fact";

/// A stored fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Row ID (assigned by storage layer).
    pub id: Option<i64>,

    /// The fact text.
    pub content: String,

    /// Metadata as JSON text.
    pub metadata: String,

    /// RFC 3339 timestamp of insertion.
    pub created_at: String,
}

impl MemoryRecord {
    /// Parses the metadata text, falling back to empty metadata when it is
    /// not a JSON object.
    #[must_use]
    pub fn parsed_metadata(&self) -> MemoryMetadata {
        serde_json::from_str(&self.metadata).unwrap_or_default()
    }

    /// Timestamp shown next to search hits: the metadata `timestamp` key if
    /// present, else the row timestamp.
    #[must_use]
    pub fn display_timestamp(&self) -> String {
        self.parsed_metadata()
            .timestamp
            .unwrap_or_else(|| self.created_at.clone())
    }

    /// Type tag shown next to recent records, upper-cased; `MEMORY` when the
    /// metadata carries no `type`.
    #[must_use]
    pub fn type_tag(&self) -> String {
        self.parsed_metadata()
            .kind
            .map_or_else(|| "MEMORY".to_string(), |k| k.to_uppercase())
    }
}

/// Well-known metadata keys; unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    /// Record type (e.g. `manual_fact`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Timestamp recorded by the writer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Optional caller-supplied category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Any other keys.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MemoryMetadata {
    /// Metadata for a manually remembered fact.
    #[must_use]
    pub fn manual_fact(timestamp: String, category: Option<String>) -> Self {
        Self {
            kind: Some(MANUAL_FACT.to_string()),
            timestamp: Some(timestamp),
            category,
            extra: serde_json::Map::new(),
        }
    }
}
