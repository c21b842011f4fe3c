//! Content chunking for Engram.
//!
//! The remote workspace rejects rich text longer than a fixed limit per block,
//! so long content is split into bounded segments, one block each:
//!
//! - **Fixed**: character-bounded splitting with optional line alignment
//! - **Blocks**: wrapping segments into page bodies and appended sections

pub mod blocks;
pub mod fixed;

pub use blocks::{append_children, bounded_title, page_children};
pub use fixed::FixedChunker;

/// Default segment bound in characters, matching the workspace API's limit
/// on a single rich-text content string.
pub const DEFAULT_SEGMENT_LIMIT: usize = 2000;

/// Largest bound accepted from configuration. The API rejects anything above.
pub const MAX_SEGMENT_LIMIT: usize = 2000;
