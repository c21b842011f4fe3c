//! Block representation for the remote workspace.
//!
//! A block is a typed container holding one fragment of page content. The
//! wire shape places the type name under `"type"` and the body under a key of
//! the same name:
//!
//! ```json
//! {"type": "paragraph", "paragraph": {"rich_text": [{"type": "text", "text": {"content": "hi"}}]}}
//! ```
//!
//! Block types this crate does not understand deserialize to
//! [`BlockKind::Unsupported`] instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fragment of styled text inside a block.
///
/// Outgoing runs carry `text.content`; runs read back from the API also carry
/// `plain_text`, which is preferred when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    /// Run type; always `"text"` for runs built by this crate.
    #[serde(rename = "type", default = "default_run_type")]
    pub kind: String,

    /// Raw text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,

    /// Rendered plain text, as reported by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
}

/// Text payload of a rich-text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    /// The literal text.
    pub content: String,
}

fn default_run_type() -> String {
    "text".to_string()
}

impl RichText {
    /// Creates an unstyled text run.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: default_run_type(),
            text: Some(TextContent {
                content: content.into(),
            }),
            plain_text: None,
        }
    }

    /// Returns the visible text of this run.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.plain_text
            .as_deref()
            .or_else(|| self.text.as_ref().map(|t| t.content.as_str()))
            .unwrap_or("")
    }
}

/// Concatenates a sequence of runs into their visible text.
#[must_use]
pub fn runs_to_text(runs: &[RichText]) -> String {
    runs.iter().map(RichText::as_str).collect()
}

/// Body of a text-bearing block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    /// Ordered rich-text runs.
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

impl TextBody {
    /// Creates a body holding a single unstyled run.
    #[must_use]
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            rich_text: vec![RichText::plain(content)],
        }
    }
}

/// Body of a `child_page` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildPageBody {
    /// Title of the sub-page.
    #[serde(default)]
    pub title: String,
}

/// Typed block content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    /// Plain paragraph.
    Paragraph {
        /// Paragraph body.
        paragraph: TextBody,
    },
    /// Top-level heading.
    #[serde(rename = "heading_1")]
    Heading1 {
        /// Heading body.
        heading_1: TextBody,
    },
    /// Second-level heading.
    #[serde(rename = "heading_2")]
    Heading2 {
        /// Heading body.
        heading_2: TextBody,
    },
    /// Third-level heading.
    #[serde(rename = "heading_3")]
    Heading3 {
        /// Heading body.
        heading_3: TextBody,
    },
    /// Bulleted list item.
    BulletedListItem {
        /// Item body.
        bulleted_list_item: TextBody,
    },
    /// Numbered list item.
    NumberedListItem {
        /// Item body.
        numbered_list_item: TextBody,
    },
    /// Block quote.
    Quote {
        /// Quote body.
        quote: TextBody,
    },
    /// Link to a nested page.
    ChildPage {
        /// Sub-page descriptor.
        child_page: ChildPageBody,
    },
    /// Any block type without text handling here (images, dividers, ...).
    #[serde(other)]
    Unsupported,
}

impl BlockKind {
    /// Returns the wire type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Paragraph { .. } => "paragraph",
            Self::Heading1 { .. } => "heading_1",
            Self::Heading2 { .. } => "heading_2",
            Self::Heading3 { .. } => "heading_3",
            Self::BulletedListItem { .. } => "bulleted_list_item",
            Self::NumberedListItem { .. } => "numbered_list_item",
            Self::Quote { .. } => "quote",
            Self::ChildPage { .. } => "child_page",
            Self::Unsupported => "unsupported",
        }
    }

    /// Returns the text body for text-bearing kinds.
    #[must_use]
    pub const fn text_body(&self) -> Option<&TextBody> {
        match self {
            Self::Paragraph { paragraph: body }
            | Self::Heading1 { heading_1: body }
            | Self::Heading2 { heading_2: body }
            | Self::Heading3 { heading_3: body }
            | Self::BulletedListItem {
                bulleted_list_item: body,
            }
            | Self::NumberedListItem {
                numbered_list_item: body,
            }
            | Self::Quote { quote: body } => Some(body),
            Self::ChildPage { .. } | Self::Unsupported => None,
        }
    }
}

/// A block as sent to or received from the workspace API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Block ID (assigned by the remote service; absent on outgoing blocks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Typed content.
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl Block {
    /// Wraps a kind into an outgoing block.
    #[must_use]
    pub const fn new(kind: BlockKind) -> Self {
        Self { id: None, kind }
    }

    /// Creates a paragraph block holding `text` as a single run.
    ///
    /// # Examples
    ///
    /// ```
    /// use engram_rs::core::Block;
    ///
    /// let block = Block::paragraph("hello");
    /// assert_eq!(block.type_name(), "paragraph");
    /// assert_eq!(block.plain_text().as_deref(), Some("hello"));
    /// ```
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph {
            paragraph: TextBody::plain(text),
        })
    }

    /// Creates a second-level heading block.
    #[must_use]
    pub fn heading_2(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading2 {
            heading_2: TextBody::plain(text),
        })
    }

    /// Creates a text block of the given content kind.
    #[must_use]
    pub fn text(kind: ContentKind, text: impl Into<String>) -> Self {
        let body = TextBody::plain(text);
        Self::new(match kind {
            ContentKind::Paragraph => BlockKind::Paragraph { paragraph: body },
            ContentKind::BulletedListItem => BlockKind::BulletedListItem {
                bulleted_list_item: body,
            },
            ContentKind::NumberedListItem => BlockKind::NumberedListItem {
                numbered_list_item: body,
            },
            ContentKind::Quote => BlockKind::Quote { quote: body },
        })
    }

    /// Returns the wire type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Returns the visible text of a text-bearing block, runs concatenated
    /// in order. `None` for kinds that carry no text.
    #[must_use]
    pub fn plain_text(&self) -> Option<String> {
        self.kind.text_body().map(|body| runs_to_text(&body.rich_text))
    }
}

/// Block kinds accepted for appended page content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Plain paragraphs.
    #[default]
    Paragraph,
    /// Bulleted list items.
    BulletedListItem,
    /// Numbered list items.
    NumberedListItem,
    /// Block quotes.
    Quote,
}

impl ContentKind {
    /// Returns the wire type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::Quote => "quote",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paragraph" => Ok(Self::Paragraph),
            "bulleted_list_item" | "bullet" => Ok(Self::BulletedListItem),
            "numbered_list_item" | "numbered" => Ok(Self::NumberedListItem),
            "quote" => Ok(Self::Quote),
            other => Err(format!("unsupported content type: {other}")),
        }
    }
}
