//! Workspace API trait definition.
//!
//! Defines the remote operations the tools depend on, one method per
//! operation, so the HTTP client can be swapped for a recording fake.

use crate::core::Block;
use crate::error::Result;
use crate::notion::types::{CreatedPage, PageEntry, SearchHit, SearchRequest};

/// Remote content-container operations.
///
/// Implementations surface failures as [`crate::error::RemoteError`] and
/// never retry.
pub trait WorkspaceApi: Send + Sync {
    /// Creates a page under `parent_id` with the given title and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn create_page(&self, parent_id: &str, title: &str, children: &[Block]) -> Result<CreatedPage>;

    /// Appends blocks to the end of a page or block.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn append_children(&self, block_id: &str, children: &[Block]) -> Result<()>;

    /// Lists the direct children of a page or block, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn list_children(&self, block_id: &str) -> Result<Vec<Block>>;

    /// Deletes (archives) a block.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn delete_block(&self, block_id: &str) -> Result<()>;

    /// Searches pages and databases shared with the integration.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>>;

    /// Lists the rows of a database.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote call fails.
    fn query_database(&self, database_id: &str) -> Result<Vec<PageEntry>>;
}
