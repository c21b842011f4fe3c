//! Segment-to-block conversion.
//!
//! Turns chunked content into the block lists sent to the workspace API: the
//! body of a new page, or a titled section appended to an existing page.

use crate::chunking::FixedChunker;
use crate::core::{Block, ContentKind};
use crate::error::Result;
use unicode_segmentation::UnicodeSegmentation;

/// Builds the children of a new page: one paragraph block per segment.
///
/// # Errors
///
/// Returns an error if the chunker is misconfigured.
///
/// # Examples
///
/// ```
/// use engram_rs::chunking::{FixedChunker, page_children};
///
/// let blocks = page_children(&FixedChunker::with_bound(2000), &"a".repeat(3000)).unwrap();
/// assert_eq!(blocks.len(), 2);
/// ```
pub fn page_children(chunker: &FixedChunker, content: &str) -> Result<Vec<Block>> {
    Ok(chunker
        .segment(content)?
        .into_iter()
        .map(|segment| Block::paragraph(segment.content))
        .collect())
}

/// Builds a section for appending to an existing page: a `heading_2` title
/// block (omitted when `title` is absent or blank), then one block of `kind`
/// per segment of `content`.
///
/// Titles longer than the bound are cut to the bound.
///
/// # Errors
///
/// Returns an error if the chunker is misconfigured.
pub fn append_children(
    chunker: &FixedChunker,
    title: Option<&str>,
    content: &str,
    kind: ContentKind,
) -> Result<Vec<Block>> {
    let segments = chunker.segment(content)?;
    let mut blocks = Vec::with_capacity(segments.len() + 1);

    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        blocks.push(Block::heading_2(bounded_title(chunker, title)));
    }

    blocks.extend(
        segments
            .into_iter()
            .map(|segment| Block::text(kind, segment.content)),
    );

    Ok(blocks)
}

/// Cuts a title to at most `chunker.bound()` characters.
///
/// The cut lands on a grapheme cluster boundary, so a combined character or
/// emoji sequence is dropped whole rather than split.
#[must_use]
pub fn bounded_title(chunker: &FixedChunker, title: &str) -> String {
    let bound = chunker.bound();
    if title.chars().count() <= bound {
        return title.to_string();
    }

    let mut end = 0;
    let mut chars = 0;
    for (offset, grapheme) in title.grapheme_indices(true) {
        let len = grapheme.chars().count();
        if chars + len > bound {
            break;
        }
        chars += len;
        end = offset + grapheme.len();
    }

    tracing::warn!(bound, "title exceeds segment bound, truncating");
    title[..end].to_string()
}
