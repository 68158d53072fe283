//! Error types for the core crate
//!
//! This module provides a consolidated error type for the core crate,
//! wrapping errors from the individual pipeline stages.

use thiserror::Error;
use std::io;

use crate::compare::EngineError;
use crate::ingest::{AssemblyError, RowError};
use crate::models::TableError;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Challenge document was rejected as a whole
    #[error("Document rejected: {0}")]
    Rejected(#[from] AssemblyError),

    /// A single row could not be normalized
    #[error("Malformed row: {0}")]
    MalformedRow(#[from] RowError),

    /// Table failed structural validation
    #[error("Invalid table: {0}")]
    InvalidTable(#[from] TableError),

    /// Query engine collaborator failed
    #[error("Query engine error: {0}")]
    Engine(#[from] EngineError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, CoreError>;

/// Convert a string error to a ConfigError
pub fn to_config_error<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::Config(err.to_string())
}
