//! Segment representation.
//!
//! Segments are bounded-length pieces of a content unit produced by the
//! chunker. Each segment maps 1:1 to a remote block and keeps its position
//! within the original content so reassembly preserves order.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A bounded-length substring of a content unit.
///
/// # Examples
///
/// ```
/// use engram_rs::core::Segment;
///
/// let segment = Segment::new(0, "Hello".to_string(), 0..5);
/// assert_eq!(segment.char_len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Sequential index within the content unit (0-based).
    pub index: usize,

    /// Segment text.
    pub content: String,

    /// Range in the original content, measured in characters.
    pub char_range: Range<usize>,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub const fn new(index: usize, content: String, char_range: Range<usize>) -> Self {
        Self {
            index,
            content,
            char_range,
        }
    }

    /// Returns the segment length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.char_range.end - self.char_range.start
    }

    /// Checks if the segment is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Reassembles segments into the content unit they were cut from.
///
/// Segments are concatenated in `index` order regardless of slice order.
#[must_use]
pub fn reassemble(segments: &[Segment]) -> String {
    let mut ordered: Vec<&Segment> = segments.iter().collect();
    ordered.sort_by_key(|s| s.index);
    ordered.iter().map(|s| s.content.as_str()).collect()
}
