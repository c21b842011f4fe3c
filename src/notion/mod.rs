//! Remote workspace access.
//!
//! The tools talk to the workspace through the [`WorkspaceApi`] trait;
//! [`NotionClient`] is the HTTP implementation.

pub mod client;
pub mod traits;
pub mod types;

pub use client::{MAX_CHILDREN_PER_REQUEST, NOTION_VERSION, NotionClient};
pub use traits::WorkspaceApi;
pub use types::{CreatedPage, ListResponse, PageEntry, Property, SearchHit, SearchRequest};
