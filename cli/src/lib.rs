//! SQL Challenge Runner
//!
//! This crate runs challenge documents against an embedded SQLite database:
//! printing setup scripts, inspecting assembled challenges and scoring
//! learner queries.

// Error types and result
pub mod error;
pub use error::{CliError, Result};

// Embedded query engine
pub mod engine;
pub use engine::SqliteEngine;

// Subcommands
pub mod commands;
