//! Text aggregation over block lists.
//!
//! The inverse of chunking: given the ordered blocks of a page, extract the
//! visible text of each text-bearing block and join the results with
//! newlines. Paragraphs contribute their text as-is; other text-bearing kinds
//! are prefixed with their upper-cased type, e.g. `[HEADING_1] Title`.
//! Blocks without text support contribute nothing.

use crate::core::{Block, BlockKind};

/// Separator placed between the contributions of consecutive blocks.
pub const BLOCK_SEPARATOR: &str = "\n";

/// Returns the contribution of one block, or `None` if it carries no text.
#[must_use]
pub fn block_text(block: &Block) -> Option<String> {
    let text = block.plain_text()?;
    match block.kind {
        BlockKind::Paragraph { .. } => Some(text),
        _ => Some(format!("[{}] {text}", block.type_name().to_uppercase())),
    }
}

/// Aggregates the visible text of a block list.
///
/// Returns an empty string when no block carries text.
///
/// # Examples
///
/// ```
/// use engram_rs::core::Block;
/// use engram_rs::reader::aggregate_text;
///
/// let blocks = vec![Block::paragraph("one"), Block::paragraph("two")];
/// assert_eq!(aggregate_text(&blocks), "one\ntwo");
/// ```
#[must_use]
pub fn aggregate_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(block_text)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// A nested page found among a page's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildPage {
    /// Block ID of the sub-page.
    pub id: String,
    /// Sub-page title.
    pub title: String,
}

/// Collects the `child_page` blocks of a block list, in order.
#[must_use]
pub fn child_pages(blocks: &[Block]) -> Vec<ChildPage> {
    blocks
        .iter()
        .filter_map(|block| match &block.kind {
            BlockKind::ChildPage { child_page } => Some(ChildPage {
                id: block.id.clone().unwrap_or_default(),
                title: child_page.title.clone(),
            }),
            _ => None,
        })
        .collect()
}
