//! # SQL Challenge Core
//!
//! Challenge-data normalization and SQL materialization for the SQL
//! challenge platform. This crate turns loosely typed challenge documents
//! into typed tables, generates the statements that materialize them in an
//! embedded engine, and scores a learner's query result.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod compare;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod schema;
pub mod utils;

/// Re-export common types for ease of use
pub use compare::{
    compare, evaluate, evaluate_with, materialize, validate_query, ComparisonVerdict, Evaluation,
    QueryEngine, QueryRejection,
};
pub use config::EngineConfig;
pub use error::{CoreError, Result};
pub use ingest::{assemble, Assembled, ChallengeAssembler, Diagnostic, Document};
pub use models::{Cell, ChallengeDefinition, TableSpec};
pub use schema::{render_script, setup_script};

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Assemble a document given as JSON text.
///
/// Fails when the text is not a JSON object or the document is rejected.
pub fn assemble_json(json: &str) -> Result<Assembled> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let assembler = ChallengeAssembler::default();
    let assembled = match &value {
        serde_json::Value::Object(doc) => assembler.assemble(doc)?,
        other => assembler.assemble_value("", other)?,
    };
    Ok(assembled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_json_to_setup_script() {
        let assembled = assemble_json(
            r#"{
                "title": "Select all",
                "sample_table": {
                    "name": "students",
                    "columns": ["id", "name"],
                    "rows": ["[1, \"Maria\"]", [2.0, "Jose"]]
                }
            }"#,
        )
        .unwrap();

        assert!(assembled.is_clean());
        let script = render_script(&setup_script(&assembled.challenge));
        assert_eq!(
            script,
            "CREATE TABLE IF NOT EXISTS students (id INTEGER, name TEXT);\n\
             INSERT INTO students (id, name) VALUES (1, 'Maria');\n\
             INSERT INTO students (id, name) VALUES (2, 'Jose');\n"
        );
    }

    #[test]
    fn test_assemble_json_errors() {
        assert!(matches!(assemble_json("not json"), Err(CoreError::Json(_))));
        assert!(matches!(assemble_json("[1, 2]"), Err(CoreError::Rejected(_))));
        assert!(matches!(assemble_json("{}"), Err(CoreError::Rejected(_))));
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
