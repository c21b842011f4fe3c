//! Error types for Engram operations.
//!
//! This module provides the error hierarchy using `thiserror` for all
//! operations including the fact cache, chunking, the remote workspace API,
//! and CLI commands.

use thiserror::Error;

/// Result type alias for Engram operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Engram operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage-related errors (fact cache operations).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Chunking-related errors (segment bound configuration).
    #[error("chunking error: {0}")]
    Chunking(#[from] ChunkingError),

    /// Remote workspace or alert API errors.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// CLI and tool invocation errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration errors.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },
}

impl Error {
    /// Builds a configuration error from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Storage-specific errors for the fact cache.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Database(String),

    /// Could not create the directory holding the database file.
    #[error("failed to create directory: {path}: {reason}")]
    DirectoryFailed {
        /// Path to the directory.
        path: String,
        /// Reason for failure.
        reason: String,
    },

    /// Schema migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Chunking-specific errors.
#[derive(Error, Debug)]
pub enum ChunkingError {
    /// The segment bound must be a positive number of characters.
    #[error("invalid segment bound {bound}: must be > 0")]
    InvalidBound {
        /// The rejected bound.
        bound: usize,
    },

    /// The segment bound exceeds what the remote service accepts.
    #[error("segment bound {bound} exceeds maximum {max}")]
    BoundTooLarge {
        /// The rejected bound.
        bound: usize,
        /// Maximum allowed bound.
        max: usize,
    },
}

/// Errors surfaced by remote collaborators (workspace API, alert channel).
///
/// These are propagated to the caller unchanged and never retried.
#[derive(Error, Debug)]
pub enum RemoteError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Http(String),

    /// The remote API answered with an error status.
    #[error("API error {status} ({code}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Machine-readable error code reported by the API.
        code: String,
        /// Human-readable error message reported by the API.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// CLI and tool invocation errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Unknown tool name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Missing required argument.
    #[error("missing required argument: {0}")]
    MissingArgument(String),

    /// Output format error.
    #[error("output format error: {0}")]
    OutputFormat(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(String),
}

// Implement From traits for dependency errors

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Command(CommandError::Io(err.to_string()))
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(StorageError::Database(err.to_string()))
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Remote(err.into())
    }
}
