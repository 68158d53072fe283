//! Error types for the challenge runner

use std::io;
use thiserror::Error;

use sql_challenge_core::CoreError;

/// Result type for the runner
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for the runner
#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File being read
        path: String,
        /// Underlying error
        source: io::Error,
    },

    /// Core pipeline error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Neither `--query` nor `--query-file` was given
    #[error("No query given; pass --query or --query-file")]
    MissingQuery,

    /// Actual result file is not a `{columns, rows}` object
    #[error("Invalid result file: {0}")]
    InvalidResult(String),

    /// SQLite could not be opened
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl CliError {
    /// Wrap an I/O error with the path that caused it
    pub fn io(path: &str, source: io::Error) -> Self {
        CliError::Io {
            path: path.to_string(),
            source,
        }
    }
}
