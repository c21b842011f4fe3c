//! CLI command implementations.
//!
//! Tool subcommands are converted to a [`ToolCall`] and dispatched through
//! the same registry used by `call` and `serve`.

use crate::cli::output::{OutputFormat, format_status, format_tool_list, format_tool_result};
use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::error::{CommandError, Result};
use crate::storage::{MemoryCache, MemoryStore};
use crate::tools::{Engram, TOOLS, ToolCall, ToolRequest, dispatch};
use serde_json::{Value, json};
use std::io::{self, BufRead, Read, Write};

/// Executes the CLI command.
///
/// Tool commands load configuration from the environment, with `--db-path`
/// and `--segment-limit` taking precedence.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the command fails.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Tools => Ok(format_tool_list(TOOLS, format)),
        Commands::Status => cmd_status(&MemoryCache::new(cli.get_db_path()), format),
        _ => {
            let config = load_config(cli)?;
            let engram = Engram::from_config(&config)?;
            execute_with(cli, &engram)
        }
    }
}

/// Executes a tool command against an existing tool set.
///
/// # Errors
///
/// Returns an error if the command or the tool fails.
pub fn execute_with(cli: &Cli, engram: &Engram) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Tools => Ok(format_tool_list(TOOLS, format)),
        Commands::Status => Ok(format_status(&engram.memory_stats()?, format)),
        Commands::Serve => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            serve(engram, stdin.lock(), stdout.lock())?;
            Ok(String::new())
        }
        Commands::Call { tool, arguments } => {
            let arguments: Value = serde_json::from_str(arguments).map_err(|e| {
                CommandError::InvalidArgument(format!("arguments must be JSON: {e}"))
            })?;
            let call = ToolCall::parse(tool, arguments)?;
            run_tool(engram, &call, format)
        }
        command => {
            let call = tool_call(command)?;
            run_tool(engram, &call, format)
        }
    }
}

/// Builds the configuration for tool commands from the process environment.
///
/// # Errors
///
/// Returns [`crate::Error::Config`] if the environment is incomplete or a
/// value is out of range.
pub fn load_config(cli: &Cli) -> Result<Config> {
    load_config_from(cli, |key| std::env::var(key).ok())
}

/// Builds the configuration from `lookup`, applies the CLI overrides, then
/// validates the result once.
///
/// # Errors
///
/// Returns [`crate::Error::Config`] if a required key is missing or the
/// final value is out of range.
pub fn load_config_from<F>(cli: &Cli, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::from_lookup(lookup)?;
    if let Some(path) = &cli.db_path {
        config.db_path.clone_from(path);
    }
    if let Some(limit) = cli.segment_limit {
        config.segment_limit = limit;
    }
    config.validate()?;
    Ok(config)
}

fn run_tool(engram: &Engram, call: &ToolCall, format: OutputFormat) -> Result<String> {
    let result = dispatch(engram, call)?;
    Ok(format_tool_result(call.name(), &result, format))
}

fn cmd_status(cache: &MemoryCache, format: OutputFormat) -> Result<String> {
    let stats = cache.with_store(|store| store.stats())?;
    Ok(format_status(&stats, format))
}

/// Converts a tool subcommand into a call.
fn tool_call(command: &Commands) -> Result<ToolCall> {
    let call = match command {
        Commands::CreatePage {
            title,
            content,
            parent,
        } => ToolCall::CreatePage {
            title: title.clone(),
            content: read_content(content.as_deref())?,
            parent_id: parent.clone(),
        },
        Commands::UpdatePage {
            page_id,
            content,
            title,
            kind,
        } => ToolCall::UpdatePage {
            page_id: page_id.clone(),
            title: title.clone(),
            content: read_content(content.as_deref())?,
            kind: *kind,
        },
        Commands::LogToNotion {
            title,
            content,
            page,
        } => ToolCall::LogToNotion {
            title: title.clone(),
            content: read_content(content.as_deref())?,
            page_id: page.clone(),
        },
        Commands::ReadPageContent { page_id } => ToolCall::ReadPageContent {
            page_id: page_id.clone(),
        },
        Commands::ListSubPages { parent } => ToolCall::ListSubPages {
            parent_id: parent.clone(),
        },
        Commands::ListDatabases => ToolCall::ListDatabases {},
        Commands::QueryDatabase { database_id } => ToolCall::QueryDatabase {
            database_id: database_id.clone(),
        },
        Commands::DeleteBlock { block_id } => ToolCall::DeleteBlock {
            block_id: block_id.clone(),
        },
        Commands::RememberFact { fact, category } => ToolCall::RememberFact {
            fact: fact.clone(),
            category: category.clone(),
        },
        Commands::SearchMemory { query, limit } => ToolCall::SearchMemory {
            query: query.clone(),
            limit: *limit,
        },
        Commands::GetRecentMemories { limit } => ToolCall::GetRecentMemories { limit: *limit },
        Commands::SendAlert { message } => ToolCall::SendAlert {
            message: message.clone(),
        },
        Commands::Status | Commands::Tools | Commands::Call { .. } | Commands::Serve => {
            return Err(CommandError::InvalidArgument(
                "not a tool command".to_string(),
            )
            .into());
        }
    };
    Ok(call)
}

/// Returns the given content, or reads it from stdin.
fn read_content(content: Option<&str>) -> Result<String> {
    if let Some(c) = content {
        return Ok(c.to_string());
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| CommandError::Io(format!("failed to read from stdin: {e}")))?;
    Ok(buffer)
}

/// Answers one line-delimited JSON request.
///
/// Success is `{"tool": ..., "result": ...}`; failure is
/// `{"tool": ..., "error": ...}` (`tool` is omitted if the line did not
/// parse).
#[must_use]
pub fn handle_request(engram: &Engram, line: &str) -> Value {
    let request: ToolRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return json!({ "error": format!("invalid request: {e}") }),
    };

    let tool = request.tool.clone();
    match request.into_call().and_then(|call| dispatch(engram, &call)) {
        Ok(result) => json!({ "tool": tool, "result": result }),
        Err(e) => {
            tracing::warn!(tool = %tool, error = %e, "tool call failed");
            json!({ "tool": tool, "error": e.to_string() })
        }
    }
}

/// Reads requests from `input` until EOF, writing one response per line.
///
/// Blank lines are skipped. A failing request produces an error response
/// and does not stop the loop.
///
/// # Errors
///
/// Returns an error only if reading input or writing output fails.
pub fn serve<R: BufRead, W: Write>(engram: &Engram, input: R, mut output: W) -> Result<()> {
    tracing::info!("serving tool requests on stdin");

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_request(engram, &line);
        writeln!(output, "{response}")?;
        output.flush()?;
    }

    Ok(())
}
