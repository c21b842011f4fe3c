//! Request and response shapes for the Notion API.
//!
//! Only the fields this crate reads are modelled; everything else in a
//! response is ignored during deserialization.

use crate::core::{Block, RichText, runs_to_text};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Whether more pages follow.
    #[serde(default)]
    pub has_more: bool,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A page of child blocks.
pub type BlockList = ListResponse<Block>;

/// Response of page creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedPage {
    /// ID of the new page.
    pub id: String,
    /// Public URL of the new page.
    #[serde(default)]
    pub url: Option<String>,
}

/// A page property. Only title properties are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Property {
    /// Property ID (`"title"` for the title property).
    #[serde(default)]
    pub id: Option<String>,
    /// Property type.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Title runs, present on title properties.
    #[serde(default)]
    pub title: Option<Vec<RichText>>,
}

/// Returns the text of the first title property, if any.
fn title_from_properties(properties: &BTreeMap<String, Property>) -> Option<String> {
    properties
        .values()
        .find_map(|p| p.title.as_deref())
        .map(runs_to_text)
}

/// A database row (page) returned by a database query.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageEntry {
    /// Page ID.
    pub id: String,
    /// Page properties keyed by name.
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
}

impl PageEntry {
    /// Returns the page title, if it has a non-empty title property.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        title_from_properties(&self.properties).filter(|t| !t.is_empty())
    }
}

/// An object returned by search: a page or a database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchHit {
    /// Object type, `"page"` or `"database"`.
    #[serde(default)]
    pub object: String,
    /// Object ID.
    pub id: String,
    /// Database title runs.
    #[serde(default)]
    pub title: Vec<RichText>,
    /// Page properties keyed by name.
    #[serde(default)]
    pub properties: BTreeMap<String, Property>,
}

impl SearchHit {
    /// Returns the display title of a page or database.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let title = if self.title.is_empty() {
            title_from_properties(&self.properties)?
        } else {
            runs_to_text(&self.title)
        };
        Some(title).filter(|t| !t.is_empty())
    }

    /// Checks if this hit is a database.
    #[must_use]
    pub fn is_database(&self) -> bool {
        self.object == "database"
    }
}

/// Object types a search can be filtered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchObject {
    /// Pages only.
    Page,
    /// Databases only.
    Database,
}

/// Search filter body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchFilter {
    /// Filtered value.
    pub value: SearchObject,
    /// Filtered property; always `"object"`.
    pub property: &'static str,
}

/// Body of a search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Text to match against titles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Object type filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<SearchFilter>,
}

impl SearchRequest {
    /// A search returning every database shared with the integration.
    #[must_use]
    pub const fn databases() -> Self {
        Self {
            query: None,
            filter: Some(SearchFilter {
                value: SearchObject::Database,
                property: "object",
            }),
        }
    }
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Machine-readable error code.
    #[serde(default)]
    pub code: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}
