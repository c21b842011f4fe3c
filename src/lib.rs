//! # Engram
//!
//! Notion workspace tools backed by a local `SQLite` fact cache.
//!
//! Engram exposes a workspace as a set of callable tools (create, append,
//! read, list, delete, alert) and keeps a small append-only memory of facts
//! on disk. Content longer than the workspace's per-block limit is split
//! into bounded segments on the way out and reassembled on the way back.
//!
//! ## Features
//!
//! - **Chunking**: character-bounded, UTF-8 safe, optionally line-aligned
//! - **Aggregation**: block lists back to plain text
//! - **`SQLite` fact cache**: substring search and recency listing
//! - **Tool registry**: JSON requests over the CLI or line-delimited stdio

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod alert;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod notion;
pub mod reader;
pub mod storage;
pub mod tools;

// Re-export commonly used types at crate root
pub use error::{Error, Result};

// Re-export core domain types
pub use core::{Block, BlockKind, ContentKind, MemoryMetadata, MemoryRecord, Segment};

// Re-export chunking types
pub use chunking::{DEFAULT_SEGMENT_LIMIT, FixedChunker, append_children, page_children};

// Re-export reader
pub use reader::aggregate_text;

// Re-export storage types
pub use storage::{DEFAULT_DB_PATH, MemoryCache, MemoryStore, SqliteMemoryStore};

// Re-export remote collaborators
pub use alert::{AlertChannel, TelegramNotifier};
pub use notion::{NotionClient, WorkspaceApi};

// Re-export configuration and tools
pub use config::Config;
pub use tools::{Engram, ToolCall};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
