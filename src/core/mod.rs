//! Core domain models for Engram.
//!
//! This module contains the fundamental data structures used throughout the
//! crate: segments, workspace blocks, memory records, and identifier
//! handling. These are pure domain models with no I/O dependencies.

pub mod block;
pub mod id;
pub mod memory;
pub mod segment;

pub use block::{Block, BlockKind, ChildPageBody, ContentKind, RichText, TextBody, runs_to_text};
pub use id::normalize_id;
pub use memory::{MANUAL_FACT, MemoryMetadata, MemoryRecord};
pub use segment::{Segment, reassemble};
