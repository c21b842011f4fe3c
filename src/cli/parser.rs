//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::core::ContentKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Engram: Notion workspace tools with a local fact cache.
///
/// Each tool is available as a subcommand; `call` and `serve` accept JSON
/// tool requests instead.
#[derive(Parser, Debug)]
#[command(name = "engram")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the fact cache database file.
    ///
    /// Defaults to `.engram/memory.db` in the current directory.
    #[arg(short, long, env = "ENGRAM_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Maximum characters per block (1-2000).
    #[arg(long, env = "ENGRAM_SEGMENT_LIMIT", global = true)]
    pub segment_limit: Option<usize>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new page; long content is split into multiple blocks.
    CreatePage {
        /// Page title.
        title: String,

        /// Page content (reads from stdin if not provided).
        content: Option<String>,

        /// Parent page ID or URL (defaults to NOTION_PAGE_ID).
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Append a titled section to an existing page.
    UpdatePage {
        /// Page ID or URL.
        page_id: String,

        /// Section content (reads from stdin if not provided).
        content: Option<String>,

        /// Section heading.
        #[arg(short, long)]
        title: Option<String>,

        /// Block type for the content (paragraph, bullet, numbered, quote).
        #[arg(short = 'k', long = "type", default_value = "paragraph")]
        kind: ContentKind,
    },

    /// Append a titled note to a page.
    #[command(alias = "log")]
    LogToNotion {
        /// Note heading.
        title: String,

        /// Note content (reads from stdin if not provided).
        content: Option<String>,

        /// Page ID or URL (defaults to NOTION_PAGE_ID).
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Print the text content of a page.
    #[command(alias = "read")]
    ReadPageContent {
        /// Page ID or URL.
        page_id: String,
    },

    /// List the sub-pages of a page.
    ListSubPages {
        /// Parent page ID or URL (defaults to NOTION_PAGE_ID).
        parent: Option<String>,
    },

    /// List the databases shared with the integration.
    ListDatabases,

    /// List the entries of a database.
    QueryDatabase {
        /// Database ID or URL.
        database_id: String,
    },

    /// Delete (archive) a block or page.
    #[command(alias = "rm")]
    DeleteBlock {
        /// Block ID or URL.
        block_id: String,
    },

    /// Store a fact in the local memory cache.
    #[command(alias = "remember")]
    RememberFact {
        /// The fact to remember.
        fact: String,

        /// Optional category.
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Search stored facts by substring.
    #[command(alias = "recall")]
    SearchMemory {
        /// Text to search for.
        query: String,

        /// Maximum number of results.
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },

    /// Show the most recently stored facts.
    #[command(alias = "recent")]
    GetRecentMemories {
        /// Number of facts to show.
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },

    /// Send an alert to the configured Telegram chat.
    #[command(alias = "alert")]
    SendAlert {
        /// Alert message.
        message: String,
    },

    /// Show fact cache status.
    Status,

    /// List available tools.
    Tools,

    /// Invoke a tool with JSON arguments.
    Call {
        /// Tool name (see `engram tools`).
        tool: String,

        /// Arguments as a JSON object.
        #[arg(default_value = "{}")]
        arguments: String,
    },

    /// Serve tool requests as line-delimited JSON on stdin/stdout.
    Serve,
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}
