//! Error types for blockio-nri
//!
//! This module defines all error types used by the plugin, its runner and
//! the process bootstrap. Uses `thiserror` for ergonomic error handling with
//! automatic `Display` and `Error` trait implementations.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for blockio-nri operations.
#[derive(Error, Debug)]
pub enum NriError {
    /// Configuration errors (unparsable log level, bad override values)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The log file could not be opened or created
    #[error("error opening file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Runner-level protocol errors (missing or unsupported command)
    #[error("{0}")]
    Protocol(String),

    /// A plugin reported a failed invocation
    #[error("Invoke error: {0}")]
    Invoke(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for blockio-nri operations.
pub type Result<T> = std::result::Result<T, NriError>;
