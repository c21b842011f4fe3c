//! Runtime configuration.
//!
//! All settings are collected into one [`Config`] value at startup and passed
//! to constructors. Validation happens once, in [`Config::validate`], so a
//! missing API key or an out-of-range bound fails before any tool runs.

use crate::chunking::{DEFAULT_SEGMENT_LIMIT, MAX_SEGMENT_LIMIT};
use crate::error::{Error, Result};
use crate::storage::DEFAULT_DB_PATH;
use std::path::PathBuf;
use std::time::Duration;

/// Default Notion API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Notion integration token.
    pub notion_api_key: String,
    /// Page used when a tool call names no page.
    pub default_page_id: Option<String>,
    /// Telegram alert credentials, if alerts are configured.
    pub telegram: Option<TelegramConfig>,
    /// Fact cache database path.
    pub db_path: PathBuf,
    /// Maximum characters per block.
    pub segment_limit: usize,
    /// Notion API base URL.
    pub api_base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
}

/// Telegram Bot API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot token.
    pub bot_token: String,
    /// Target chat ID.
    pub chat_id: String,
    /// Bot API base URL.
    pub base_url: String,
}

impl Config {
    /// Creates a configuration with defaults for everything but the API key.
    pub fn new(notion_api_key: impl Into<String>) -> Self {
        Self {
            notion_api_key: notion_api_key.into(),
            default_page_id: None,
            telegram: None,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            segment_limit: DEFAULT_SEGMENT_LIMIT,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Ranges are not checked here so
    /// callers can apply overrides first; call [`Config::validate`] before
    /// use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required key is missing or a value does
    /// not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("NOTION_API_KEY")
            .ok_or_else(|| Error::config("NOTION_API_KEY is not set"))?;
        let mut config = Self::new(api_key);

        config.default_page_id = get("NOTION_PAGE_ID");

        config.telegram = match (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token,
                chat_id,
                base_url: get("TELEGRAM_API_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_TELEGRAM_BASE_URL.to_string()),
            }),
            (None, None) => None,
            _ => {
                return Err(Error::config(
                    "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID must be set together",
                ));
            }
        };

        if let Some(path) = get("ENGRAM_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(limit) = get("ENGRAM_SEGMENT_LIMIT") {
            config.segment_limit = parse_number("ENGRAM_SEGMENT_LIMIT", &limit)?;
        }
        if let Some(url) = get("NOTION_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(secs) = get("ENGRAM_HTTP_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("ENGRAM_HTTP_TIMEOUT_SECS", &secs)?);
        }

        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.notion_api_key.trim().is_empty() {
            return Err(Error::config("NOTION_API_KEY is empty"));
        }
        if self.segment_limit == 0 || self.segment_limit > MAX_SEGMENT_LIMIT {
            return Err(Error::config(format!(
                "segment limit must be between 1 and {MAX_SEGMENT_LIMIT}, got {}",
                self.segment_limit
            )));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(Error::config(format!(
                "API base URL must be http(s): {}",
                self.api_base_url
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::config("HTTP timeout must be positive"));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key} must be a number, got '{value}'")))
}
