//! Fixed-bound chunking strategy.
//!
//! Splits text into segments of at most `bound` characters. Lengths are
//! counted in Unicode scalar values, so a cut never lands inside a multi-byte
//! character. Optionally pulls each cut back to the end of a line when a
//! newline sits close to the bound.
//!
//! Notion measures its 2000 limit in UTF-16 code units. Characters outside
//! the Basic Multilingual Plane (most emoji) take two units each, so a full
//! 2000-character segment of them is over the remote limit. Lower the bound
//! with `ENGRAM_SEGMENT_LIMIT` when content is emoji-heavy.

use crate::chunking::{DEFAULT_SEGMENT_LIMIT, MAX_SEGMENT_LIMIT};
use crate::core::Segment;
use crate::error::{ChunkingError, Result};

/// Chunker that splits text at a fixed character bound.
///
/// Concatenating the produced segments in order always reproduces the input
/// exactly; no separators are inserted or characters dropped.
///
/// # Examples
///
/// ```
/// use engram_rs::chunking::FixedChunker;
///
/// let chunker = FixedChunker::with_bound(2000);
/// let text = "a".repeat(3000);
/// let segments = chunker.segment(&text).unwrap();
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].char_len(), 2000);
/// assert_eq!(segments[1].char_len(), 1000);
/// ```
#[derive(Debug, Clone)]
pub struct FixedChunker {
    /// Maximum segment length in characters.
    bound: usize,
    /// Whether to align cuts to line boundaries.
    line_aware: bool,
}

impl Default for FixedChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedChunker {
    /// Creates a chunker with the default bound and line alignment enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bound: DEFAULT_SEGMENT_LIMIT,
            line_aware: true,
        }
    }

    /// Creates a chunker with a custom bound.
    ///
    /// # Arguments
    ///
    /// * `bound` - Maximum segment length in characters.
    #[must_use]
    pub const fn with_bound(bound: usize) -> Self {
        Self {
            bound,
            line_aware: true,
        }
    }

    /// Sets whether to align cuts to line boundaries.
    ///
    /// When enabled, a cut moves back to just after the last newline found
    /// in the final tenth of the window, if there is one.
    #[must_use]
    pub const fn line_aware(mut self, enabled: bool) -> Self {
        self.line_aware = enabled;
        self
    }

    /// Returns the configured bound.
    #[must_use]
    pub const fn bound(&self) -> usize {
        self.bound
    }

    /// Splits `text` into ordered segments.
    ///
    /// Text no longer than the bound (including the empty string) yields
    /// exactly one segment equal to the input.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkingError::InvalidBound`] if the bound is zero, or
    /// [`ChunkingError::BoundTooLarge`] if it exceeds [`MAX_SEGMENT_LIMIT`].
    pub fn segment(&self, text: &str) -> Result<Vec<Segment>> {
        if self.bound == 0 {
            return Err(ChunkingError::InvalidBound { bound: self.bound }.into());
        }
        if self.bound > MAX_SEGMENT_LIMIT {
            return Err(ChunkingError::BoundTooLarge {
                bound: self.bound,
                max: MAX_SEGMENT_LIMIT,
            }
            .into());
        }

        let total = text.chars().count();
        if total <= self.bound {
            return Ok(vec![Segment::new(0, text.to_string(), 0..total)]);
        }

        // Byte offset of every char start, plus the end of the text.
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();

        let mut segments = Vec::with_capacity(total.div_ceil(self.bound));
        let mut start = 0;

        while start < total {
            let mut end = (start + self.bound).min(total);
            if self.line_aware && end < total {
                end = self.line_boundary(text, &offsets, start, end);
            }

            let content = text[offsets[start]..offsets[end]].to_string();
            segments.push(Segment::new(segments.len(), content, start..end));
            start = end;
        }

        Ok(segments)
    }

    /// Finds the cut position for the window `start..end`, preferring the
    /// char just after a newline. Always returns a value in `start + 1..=end`.
    fn line_boundary(&self, text: &str, offsets: &[usize], start: usize, end: usize) -> usize {
        let look_back = (self.bound / 10).max(1);
        let search_start = end.saturating_sub(look_back).max(start + 1);
        if search_start >= end {
            return end;
        }

        let window = &text[offsets[search_start]..offsets[end]];
        window.rfind('\n').map_or(end, |pos| {
            let after_newline = offsets[search_start] + pos + 1;
            offsets.partition_point(|&o| o < after_newline)
        })
    }
}
