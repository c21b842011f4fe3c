//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::error::Error;
use crate::storage::traits::StorageStats;
use crate::tools::ToolInfo;
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats the reply of a tool.
#[must_use]
pub fn format_tool_result(tool: &str, result: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = result.to_string();
            if !output.ends_with('\n') {
                output.push('\n');
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ToolOutput<'a> {
                tool: &'a str,
                result: &'a str,
            }
            format_json(&ToolOutput { tool, result })
        }
    }
}

/// Formats the tool listing.
#[must_use]
pub fn format_tool_list(tools: &[ToolInfo], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
            let mut output = String::new();
            for tool in tools {
                let _ = writeln!(output, "{:<width$}  {}", tool.name, tool.description);
            }
            output
        }
        OutputFormat::Json => format_json(&tools),
    }
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StorageStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StorageStats) -> String {
    let mut output = String::new();
    output.push_str("Engram Status\n");
    output.push_str("=============\n\n");
    let _ = writeln!(output, "  Memories:      {}", stats.memory_count);
    let _ = writeln!(
        output,
        "  Latest:        {}",
        stats.latest.as_deref().unwrap_or("-")
    );
    let _ = writeln!(output, "  Schema:        v{}", stats.schema_version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {}", format_size(size));
    }
    output
}

/// Formats an error for display.
///
/// Text errors are the bare message; JSON errors carry the error category.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput<'a> {
                error: ErrorBody<'a>,
            }
            #[derive(Serialize)]
            struct ErrorBody<'a> {
                kind: &'a str,
                message: String,
            }
            format_json(&ErrorOutput {
                error: ErrorBody {
                    kind: error_kind(error),
                    message: error.to_string(),
                },
            })
        }
    }
}

const fn error_kind(error: &Error) -> &'static str {
    match error {
        Error::Storage(_) => "storage",
        Error::Chunking(_) => "chunking",
        Error::Remote(_) => "remote",
        Error::Command(_) => "command",
        Error::Config { .. } => "config",
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
