//! JSON tool registry.
//!
//! Maps `{"tool": "<name>", "arguments": {...}}` requests onto [`Engram`]
//! methods and lists the available tools.

use crate::core::ContentKind;
use crate::error::{CommandError, Result};
use crate::tools::{DEFAULT_RECENT_LIMIT, DEFAULT_SEARCH_LIMIT, Engram};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name and one-line description of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    /// Tool name as used in requests.
    pub name: &'static str,
    /// What the tool does.
    pub description: &'static str,
}

/// Every tool, in listing order.
pub const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        name: "create_page",
        description: "Create a new page; long content is split into multiple blocks",
    },
    ToolInfo {
        name: "update_page",
        description: "Append a titled section to an existing page",
    },
    ToolInfo {
        name: "log_to_notion",
        description: "Append a titled note to a page (defaults to NOTION_PAGE_ID)",
    },
    ToolInfo {
        name: "read_page_content",
        description: "Read the text content of a page",
    },
    ToolInfo {
        name: "list_sub_pages",
        description: "List the sub-pages of a page (defaults to NOTION_PAGE_ID)",
    },
    ToolInfo {
        name: "list_databases",
        description: "List the databases shared with the integration",
    },
    ToolInfo {
        name: "query_database",
        description: "List the entries of a database",
    },
    ToolInfo {
        name: "delete_block",
        description: "Delete (archive) a block or page",
    },
    ToolInfo {
        name: "remember_fact",
        description: "Store a fact in the local memory cache",
    },
    ToolInfo {
        name: "search_memory",
        description: "Search stored facts by substring",
    },
    ToolInfo {
        name: "get_recent_memories",
        description: "Show the most recently stored facts",
    },
    ToolInfo {
        name: "send_alert",
        description: "Send an alert message to the configured Telegram chat",
    },
];

const fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

const fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

/// A parsed tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    /// Create a page.
    CreatePage {
        /// Page title.
        title: String,
        /// Page body.
        content: String,
        /// Parent page; defaults to the configured page.
        #[serde(default)]
        parent_id: Option<String>,
    },
    /// Append a section to a page.
    UpdatePage {
        /// Target page.
        page_id: String,
        /// Section heading.
        #[serde(default)]
        title: Option<String>,
        /// Section body.
        content: String,
        /// Block kind for the body.
        #[serde(rename = "type", default)]
        kind: ContentKind,
    },
    /// Append a titled note.
    LogToNotion {
        /// Note heading.
        title: String,
        /// Note body.
        content: String,
        /// Target page; defaults to the configured page.
        #[serde(default)]
        page_id: Option<String>,
    },
    /// Read a page.
    ReadPageContent {
        /// Page to read.
        page_id: String,
    },
    /// List sub-pages.
    ListSubPages {
        /// Parent page; defaults to the configured page.
        #[serde(default)]
        parent_id: Option<String>,
    },
    /// List databases.
    ListDatabases {},
    /// Query a database.
    QueryDatabase {
        /// Database to query.
        database_id: String,
    },
    /// Delete a block.
    DeleteBlock {
        /// Block to delete.
        block_id: String,
    },
    /// Store a fact.
    RememberFact {
        /// Fact text.
        fact: String,
        /// Optional category.
        #[serde(default)]
        category: Option<String>,
    },
    /// Search facts.
    SearchMemory {
        /// Substring to match.
        query: String,
        /// Maximum hits.
        #[serde(default = "default_search_limit")]
        limit: usize,
    },
    /// Recent facts.
    GetRecentMemories {
        /// Maximum records.
        #[serde(default = "default_recent_limit")]
        limit: usize,
    },
    /// Send an alert.
    SendAlert {
        /// Alert text.
        message: String,
    },
}

impl ToolCall {
    /// Returns the tool name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreatePage { .. } => "create_page",
            Self::UpdatePage { .. } => "update_page",
            Self::LogToNotion { .. } => "log_to_notion",
            Self::ReadPageContent { .. } => "read_page_content",
            Self::ListSubPages { .. } => "list_sub_pages",
            Self::ListDatabases {} => "list_databases",
            Self::QueryDatabase { .. } => "query_database",
            Self::DeleteBlock { .. } => "delete_block",
            Self::RememberFact { .. } => "remember_fact",
            Self::SearchMemory { .. } => "search_memory",
            Self::GetRecentMemories { .. } => "get_recent_memories",
            Self::SendAlert { .. } => "send_alert",
        }
    }

    /// Parses a call from a tool name and its JSON arguments.
    ///
    /// Missing or `null` arguments are treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::UnknownTool`] for an unregistered name, or
    /// [`CommandError::InvalidArgument`] if the arguments do not fit the tool.
    pub fn parse(tool: &str, arguments: Value) -> Result<Self> {
        if !TOOLS.iter().any(|info| info.name == tool) {
            return Err(CommandError::UnknownTool(tool.to_string()).into());
        }

        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let mut request = Map::new();
        request.insert("tool".to_string(), Value::String(tool.to_string()));
        request.insert("arguments".to_string(), arguments);

        serde_json::from_value(Value::Object(request))
            .map_err(|e| CommandError::InvalidArgument(format!("{tool}: {e}")).into())
    }
}

/// A raw request as read from the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    /// Tool name.
    pub tool: String,
    /// Tool arguments.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolRequest {
    /// Parses the request into a typed call.
    ///
    /// # Errors
    ///
    /// See [`ToolCall::parse`].
    pub fn into_call(self) -> Result<ToolCall> {
        ToolCall::parse(&self.tool, self.arguments)
    }
}

/// Runs a call against the tool set.
///
/// # Errors
///
/// Returns whatever error the tool returns.
pub fn dispatch(engram: &Engram, call: &ToolCall) -> Result<String> {
    match call {
        ToolCall::CreatePage {
            title,
            content,
            parent_id,
        } => engram.create_page(title, content, parent_id.as_deref()),
        ToolCall::UpdatePage {
            page_id,
            title,
            content,
            kind,
        } => engram.update_page(page_id, title.as_deref(), content, *kind),
        ToolCall::LogToNotion {
            title,
            content,
            page_id,
        } => engram.log_to_notion(title, content, page_id.as_deref()),
        ToolCall::ReadPageContent { page_id } => engram.read_page_content(page_id),
        ToolCall::ListSubPages { parent_id } => engram.list_sub_pages(parent_id.as_deref()),
        ToolCall::ListDatabases {} => engram.list_databases(),
        ToolCall::QueryDatabase { database_id } => engram.query_database(database_id),
        ToolCall::DeleteBlock { block_id } => engram.delete_block(block_id),
        ToolCall::RememberFact { fact, category } => {
            engram.remember_fact(fact, category.as_deref())
        }
        ToolCall::SearchMemory { query, limit } => engram.search_memory(query, *limit),
        ToolCall::GetRecentMemories { limit } => engram.get_recent_memories(*limit),
        ToolCall::SendAlert { message } => Ok(engram.send_alert(message)),
    }
}
