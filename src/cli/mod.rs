//! CLI layer for Engram.
//!
//! Provides the command-line interface using clap, with one subcommand per
//! tool plus JSON entry points (`call`, `serve`).

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::{execute, execute_with, handle_request, load_config, load_config_from, serve};
pub use output::OutputFormat;
pub use parser::{Cli, Commands};
