//! Tool layer.
//!
//! [`Engram`] owns the collaborators (workspace API, fact cache, alert
//! channel, chunker) and exposes one method per tool. Every tool returns a
//! human-readable string; remote and storage failures propagate as errors,
//! except alert delivery, which is reported in the returned text.

pub mod registry;

use crate::alert::{AlertChannel, TelegramNotifier};
use crate::chunking::{FixedChunker, append_children, bounded_title, page_children};
use crate::config::Config;
use crate::core::{ContentKind, MemoryMetadata, MemoryRecord, normalize_id};
use crate::error::{CommandError, Result};
use crate::notion::{NotionClient, SearchRequest, WorkspaceApi};
use crate::reader::{aggregate_text, child_pages};
use crate::storage::{MemoryCache, MemoryStore, StorageStats};
use chrono::Utc;

pub use registry::{TOOLS, ToolCall, ToolInfo, ToolRequest, dispatch};

/// Default number of hits returned by `search_memory`.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default number of records returned by `get_recent_memories`.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Title shown for pages and databases without one.
pub const UNTITLED: &str = "Untitled";

/// Reply of `send_alert` when no alert channel is configured.
pub const ALERT_NOT_CONFIGURED: &str =
    "Alerts are not configured. Set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID to enable them.";

/// The tool set.
pub struct Engram {
    api: Box<dyn WorkspaceApi>,
    cache: MemoryCache,
    alerts: Option<Box<dyn AlertChannel>>,
    chunker: FixedChunker,
    default_page_id: Option<String>,
}

impl std::fmt::Debug for Engram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engram")
            .field("cache", &self.cache)
            .field("alerts", &self.alerts.is_some())
            .field("chunker", &self.chunker)
            .field("default_page_id", &self.default_page_id)
            .finish_non_exhaustive()
    }
}

impl Engram {
    /// Creates a tool set over the given workspace API and fact cache, with
    /// the default chunker, no alert channel and no default page.
    pub fn new(api: Box<dyn WorkspaceApi>, cache: MemoryCache) -> Self {
        Self {
            api,
            cache,
            alerts: None,
            chunker: FixedChunker::new(),
            default_page_id: None,
        }
    }

    /// Wires the real collaborators from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or an HTTP client
    /// cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut engram = Self::new(
            Box::new(NotionClient::new(config)?),
            MemoryCache::new(config.db_path.clone()),
        )
        .with_chunker(FixedChunker::with_bound(config.segment_limit));

        if let Some(page_id) = &config.default_page_id {
            engram = engram.with_default_page(page_id);
        }
        if let Some(telegram) = &config.telegram {
            engram = engram.with_alerts(Box::new(TelegramNotifier::new(telegram, config.timeout)?));
        }

        Ok(engram)
    }

    /// Sets the alert channel.
    #[must_use]
    pub fn with_alerts(mut self, alerts: Box<dyn AlertChannel>) -> Self {
        self.alerts = Some(alerts);
        self
    }

    /// Sets the chunker used for page bodies and appended sections.
    #[must_use]
    pub fn with_chunker(mut self, chunker: FixedChunker) -> Self {
        self.chunker = chunker;
        self
    }

    /// Sets the page used when a call names none.
    #[must_use]
    pub fn with_default_page(mut self, page_id: impl AsRef<str>) -> Self {
        self.default_page_id = Some(normalize_id(page_id.as_ref()));
        self
    }

    /// Returns the fact cache handle.
    #[must_use]
    pub const fn cache(&self) -> &MemoryCache {
        &self.cache
    }

    /// Resolves an optional page argument against the default page.
    fn page_or_default(&self, page_id: Option<&str>, argument: &str) -> Result<String> {
        page_id
            .filter(|id| !id.trim().is_empty())
            .map(normalize_id)
            .or_else(|| self.default_page_id.clone())
            .ok_or_else(|| CommandError::MissingArgument(argument.to_string()).into())
    }

    /// Creates a page whose body is `content` split into paragraph blocks.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingArgument`] if neither `parent_id` nor a
    /// default page is available, or the remote error if creation fails.
    pub fn create_page(&self, title: &str, content: &str, parent_id: Option<&str>) -> Result<String> {
        let parent = self.page_or_default(parent_id, "parent_id")?;
        let title = bounded_title(&self.chunker, title);
        let children = page_children(&self.chunker, content)?;

        tracing::info!(parent = %parent, blocks = children.len(), "create_page");
        let page = self.api.create_page(&parent, &title, &children)?;

        let url = page
            .url
            .unwrap_or_else(|| format!("https://www.notion.so/{}", page.id.replace('-', "")));
        Ok(format!("Successfully created page '{title}': {url}"))
    }

    /// Appends a titled section to an existing page.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the append fails.
    pub fn update_page(
        &self,
        page_id: &str,
        title: Option<&str>,
        content: &str,
        kind: ContentKind,
    ) -> Result<String> {
        let page_id = normalize_id(page_id);
        let children = append_children(&self.chunker, title, content, kind)?;

        tracing::info!(page = %page_id, blocks = children.len(), kind = %kind, "update_page");
        self.api.append_children(&page_id, &children)?;

        Ok(format!("Successfully updated page {page_id}"))
    }

    /// Appends a titled paragraph section to `page_id` or the default page.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingArgument`] if no page is available, or
    /// the remote error if the append fails.
    pub fn log_to_notion(&self, title: &str, content: &str, page_id: Option<&str>) -> Result<String> {
        let page_id = self.page_or_default(page_id, "page_id")?;
        self.update_page(&page_id, Some(title), content, ContentKind::Paragraph)
    }

    /// Returns the aggregated text of a page.
    ///
    /// # Errors
    ///
    /// Returns the remote error if listing fails.
    pub fn read_page_content(&self, page_id: &str) -> Result<String> {
        let page_id = normalize_id(page_id);
        tracing::info!(page = %page_id, "read_page_content");

        let blocks = self.api.list_children(&page_id)?;
        let text = aggregate_text(&blocks);
        if text.is_empty() {
            return Ok("Page is empty.".to_string());
        }
        Ok(text)
    }

    /// Lists the sub-pages of `parent_id` or the default page.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::MissingArgument`] if no page is available, or
    /// the remote error if listing fails.
    pub fn list_sub_pages(&self, parent_id: Option<&str>) -> Result<String> {
        let parent = self.page_or_default(parent_id, "parent_id")?;
        tracing::info!(parent = %parent, "list_sub_pages");

        let blocks = self.api.list_children(&parent)?;
        let pages = child_pages(&blocks);
        if pages.is_empty() {
            return Ok("No sub-pages found.".to_string());
        }
        Ok(render_listing(
            pages.iter().map(|p| (Some(p.title.as_str()), p.id.as_str())),
        ))
    }

    /// Lists the databases shared with the integration.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the search fails.
    pub fn list_databases(&self) -> Result<String> {
        tracing::info!("list_databases");

        let hits = self.api.search(&SearchRequest::databases())?;
        let databases: Vec<_> = hits
            .iter()
            .filter(|hit| hit.is_database())
            .map(|hit| (hit.title(), hit.id.as_str()))
            .collect();
        if databases.is_empty() {
            return Ok("No databases found.".to_string());
        }
        Ok(render_listing(
            databases.iter().map(|(title, id)| (title.as_deref(), *id)),
        ))
    }

    /// Lists the rows of a database by title.
    ///
    /// # Errors
    ///
    /// Returns the remote error if the query fails.
    pub fn query_database(&self, database_id: &str) -> Result<String> {
        let database_id = normalize_id(database_id);
        tracing::info!(database = %database_id, "query_database");

        let entries = self.api.query_database(&database_id)?;
        if entries.is_empty() {
            return Ok("No entries found in database.".to_string());
        }
        let rows: Vec<_> = entries.iter().map(|e| (e.title(), e.id.as_str())).collect();
        Ok(render_listing(rows.iter().map(|(title, id)| (title.as_deref(), *id))))
    }

    /// Deletes (archives) one block.
    ///
    /// # Errors
    ///
    /// Returns the remote error if deletion fails.
    pub fn delete_block(&self, block_id: &str) -> Result<String> {
        let block_id = normalize_id(block_id);
        tracing::info!(block = %block_id, "delete_block");

        self.api.delete_block(&block_id)?;
        Ok(format!("Successfully deleted block {block_id}"))
    }

    /// Stores a fact in the local cache.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the insert fails.
    pub fn remember_fact(&self, fact: &str, category: Option<&str>) -> Result<String> {
        let metadata = MemoryMetadata::manual_fact(
            Utc::now().to_rfc3339(),
            category.filter(|c| !c.trim().is_empty()).map(str::to_string),
        );
        let id = self.cache.with_store(|store| store.remember(fact, &metadata))?;
        tracing::info!(id, "remember_fact");

        Ok(format!("Remembered: {fact}"))
    }

    /// Finds cached facts containing `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the query fails.
    pub fn search_memory(&self, query: &str, limit: usize) -> Result<String> {
        let records = self.cache.with_store(|store| store.search(query, limit))?;
        tracing::info!(hits = records.len(), "search_memory");

        if records.is_empty() {
            return Ok(format!("No memories found matching '{query}'."));
        }
        Ok(render_records(&records, MemoryRecord::display_timestamp))
    }

    /// Returns the most recently cached facts, newest first.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the query fails.
    pub fn get_recent_memories(&self, limit: usize) -> Result<String> {
        let records = self.cache.with_store(|store| store.recent(limit))?;
        tracing::info!(records = records.len(), "get_recent_memories");

        if records.is_empty() {
            return Ok("No memories found.".to_string());
        }
        Ok(render_records(&records, MemoryRecord::type_tag))
    }

    /// Pushes a message to the alert channel.
    ///
    /// Delivery failures are reported in the returned text rather than as an
    /// error.
    pub fn send_alert(&self, message: &str) -> String {
        let Some(alerts) = &self.alerts else {
            tracing::info!("send_alert skipped: no channel configured");
            return ALERT_NOT_CONFIGURED.to_string();
        };

        match alerts.send(message) {
            Ok(()) => {
                tracing::info!("send_alert delivered");
                "Alert sent successfully.".to_string()
            }
            Err(e) => format!("Failed to send alert: {e}"),
        }
    }

    /// Returns fact cache statistics.
    ///
    /// # Errors
    ///
    /// Returns the storage error if statistics cannot be gathered.
    pub fn memory_stats(&self) -> Result<StorageStats> {
        self.cache.with_store(|store| store.stats())
    }
}

/// Renders `- <title> (ID: <id>)` lines.
fn render_listing<'a>(items: impl IntoIterator<Item = (Option<&'a str>, &'a str)>) -> String {
    items
        .into_iter()
        .map(|(title, id)| {
            let title = title.filter(|t| !t.is_empty()).unwrap_or(UNTITLED);
            format!("- {title} (ID: {id})")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders `- [<label>] <fact>` lines.
fn render_records(records: &[MemoryRecord], label: impl Fn(&MemoryRecord) -> String) -> String {
    records
        .iter()
        .map(|record| format!("- [{}] {}", label(record), record.content))
        .collect::<Vec<_>>()
        .join("\n")
}
