//! Query evaluation against an embedded engine

use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;

use crate::models::{ChallengeDefinition, TableSpec};
use crate::schema::{setup_script, teardown_script, SqlStatement};
use super::validation::validate_query;
use super::{compare, ComparisonVerdict};

/// Failure reported by a query engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    message: String,
}

impl EngineError {
    /// Create a new engine error
    pub fn new(message: impl Into<String>) -> Self {
        EngineError {
            message: message.into(),
        }
    }

    /// Engine's own description of the failure
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Embedded SQL engine the generated statements run against
#[cfg_attr(test, mockall::automock)]
pub trait QueryEngine {
    /// Execute a statement that returns no rows
    fn execute(&mut self, sql: &str) -> Result<(), EngineError>;

    /// Run a query and collect its result as a table
    fn query(&mut self, sql: &str) -> Result<TableSpec, EngineError>;
}

fn run_all<E: QueryEngine + ?Sized>(
    engine: &mut E,
    statements: &[SqlStatement],
) -> Result<usize, EngineError> {
    for statement in statements {
        engine.execute(&statement.sql)?;
    }
    Ok(statements.len())
}

/// Run a challenge's setup script, in order, stopping at the first error.
///
/// Returns the number of statements executed.
pub fn materialize<E: QueryEngine + ?Sized>(
    engine: &mut E,
    challenge: &ChallengeDefinition,
) -> Result<usize, EngineError> {
    let statements = setup_script(challenge);
    let executed = run_all(engine, &statements)?;
    let tables = statements.iter().filter(|s| s.is_ddl()).count();
    debug!(
        "materialized {} table(s) with {} row(s) for '{}'",
        tables,
        executed - tables,
        challenge.title
    );
    Ok(executed)
}

/// Result of evaluating a learner's query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Evaluation {
    /// The query ran and its result was compared
    Compared {
        /// Comparison against the expected result
        verdict: ComparisonVerdict,
    },

    /// The query was refused before reaching the engine
    Rejected {
        /// Why the query was refused
        reason: String,
    },

    /// Setup or the query itself failed in the engine
    ExecutionFailed {
        /// Engine message
        message: String,
    },
}

impl Evaluation {
    /// Whether the learner's query produced the expected result
    pub fn passed(&self) -> bool {
        matches!(self, Evaluation::Compared { verdict } if verdict.passed)
    }

    /// Verdict, when the query ran
    pub fn verdict(&self) -> Option<&ComparisonVerdict> {
        match self {
            Evaluation::Compared { verdict } => Some(verdict),
            Evaluation::Rejected { .. } | Evaluation::ExecutionFailed { .. } => None,
        }
    }

    /// Message shown to the learner
    pub fn feedback(&self) -> String {
        match self {
            Evaluation::Compared { verdict } => verdict.feedback(),
            Evaluation::Rejected { reason } => format!("Query rejected: {}", reason),
            Evaluation::ExecutionFailed { message } => format!("Query failed: {}", message),
        }
    }
}

/// Evaluate a learner's query against a challenge.
///
/// Screens the query, drops any tables left by a previous run, materializes
/// the challenge, runs the query and compares its result against the
/// expected result. A refused query never reaches the engine and is reported
/// as [`Evaluation::Rejected`]; engine failures are reported as
/// [`Evaluation::ExecutionFailed`].
pub fn evaluate<E: QueryEngine + ?Sized>(
    engine: &mut E,
    challenge: &ChallengeDefinition,
    learner_query: &str,
) -> Evaluation {
    evaluate_with(engine, challenge, learner_query, compare)
}

/// Like [`evaluate`], with the comparison supplied by the caller.
///
/// `judge` receives the expected table and the query result, in that order.
pub fn evaluate_with<E, F>(
    engine: &mut E,
    challenge: &ChallengeDefinition,
    learner_query: &str,
    judge: F,
) -> Evaluation
where
    E: QueryEngine + ?Sized,
    F: FnOnce(&TableSpec, &TableSpec) -> ComparisonVerdict,
{
    if let Err(rejection) = validate_query(learner_query) {
        warn!("query for '{}' rejected: {}", challenge.title, rejection);
        return Evaluation::Rejected {
            reason: rejection.to_string(),
        };
    }

    let attempt = run_all(engine, &teardown_script(challenge))
        .and_then(|_| materialize(engine, challenge))
        .and_then(|_| engine.query(learner_query));

    match attempt {
        Ok(actual) => {
            let verdict = judge(&challenge.expected_result, &actual);
            info!(
                "evaluated '{}': passed={} ({} of {} rows matched)",
                challenge.title, verdict.passed, verdict.rows_matched, verdict.expected_row_count
            );
            Evaluation::Compared { verdict }
        }
        Err(err) => {
            warn!("evaluation of '{}' failed: {}", challenge.title, err);
            Evaluation::ExecutionFailed {
                message: err.message().to_string(),
            }
        }
    }
}
