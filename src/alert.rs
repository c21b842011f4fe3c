//! Outbound alerts.
//!
//! An alert is a single message pushed to a chat. The tool layer reduces the
//! outcome to a status string, so channels only report success or the error.

use crate::config::TelegramConfig;
use crate::error::{RemoteError, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A destination for alert messages.
pub trait AlertChannel: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError`] if delivery fails.
    fn send(&self, message: &str) -> Result<()>;
}

/// Sends alerts through the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: Client,
    endpoint: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct BotResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    /// Creates a notifier for the configured bot and chat.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("engram-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RemoteError::from)?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/bot{}/sendMessage",
                config.base_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
        })
    }
}

/// Interprets a Bot API reply.
fn check_reply(status: u16, body: &str) -> std::result::Result<(), RemoteError> {
    let reply: BotResponse = serde_json::from_str(body).unwrap_or_default();
    if reply.ok && (200..300).contains(&status) {
        return Ok(());
    }
    Err(RemoteError::Api {
        status: reply.error_code.unwrap_or(status),
        code: "telegram_error".to_string(),
        message: reply
            .description
            .unwrap_or_else(|| format!("unexpected reply with status {status}")),
    })
}

impl AlertChannel for TelegramNotifier {
    fn send(&self, message: &str) -> Result<()> {
        // The endpoint embeds the bot token; never log it.
        tracing::debug!(chat_id = %self.chat_id, chars = message.chars().count(), "sending alert");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text: message,
            })
            .send()
            .map_err(|e| RemoteError::Http(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        check_reply(status, &body).map_err(|e| {
            tracing::warn!(error = %e, "alert delivery failed");
            e.into()
        })
    }
}
