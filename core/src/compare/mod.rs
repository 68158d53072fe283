//! Result comparison
//!
//! Compares the table a learner's query produced against the expected
//! table. Column order and row order are both significant: columns mirror
//! the `SELECT` projection, and rows are matched by position.

mod evaluator;
mod validation;

pub use evaluator::{evaluate, evaluate_with, materialize, EngineError, Evaluation, QueryEngine};
pub use validation::{validate_query, QueryRejection, BLOCKED_KEYWORDS, MAX_QUERY_CHARS};

use serde::Serialize;

use crate::models::{NormalizedRow, TableSpec};

/// Outcome of comparing an actual result against an expected one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonVerdict {
    /// Whether the actual result matches
    pub passed: bool,

    /// Whether the column names match, case-sensitively and in order
    pub column_names_match: bool,

    /// Columns in the expected result
    pub expected_column_count: usize,

    /// Columns in the actual result
    pub actual_column_count: usize,

    /// Rows in the expected result
    pub expected_row_count: usize,

    /// Rows in the actual result
    pub actual_row_count: usize,

    /// Positions at which the expected and actual rows are equal
    pub rows_matched: usize,

    /// Expected column names, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expected_columns: Vec<String>,

    /// Actual column names, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actual_columns: Vec<String>,
}

impl ComparisonVerdict {
    /// Short explanation of the verdict for the learner
    pub fn feedback(&self) -> String {
        if self.passed {
            "Correct output".to_string()
        } else if self.expected_column_count != self.actual_column_count {
            format!(
                "Column count mismatch. Expected {}, got {}",
                self.expected_column_count, self.actual_column_count
            )
        } else if !self.column_names_match {
            format!(
                "Column names differ. Expected [{}], got [{}]",
                self.expected_columns.join(", "),
                self.actual_columns.join(", ")
            )
        } else if self.expected_row_count != self.actual_row_count {
            format!(
                "Row count mismatch. Expected {}, got {}",
                self.expected_row_count, self.actual_row_count
            )
        } else {
            format!(
                "Data values don't match the expected output ({} of {} rows matched)",
                self.rows_matched, self.expected_row_count
            )
        }
    }
}

fn rows_equal(expected: &NormalizedRow, actual: &NormalizedRow) -> bool {
    expected.len() == actual.len() && expected.iter().zip(actual.iter()).all(|(e, a)| e == a)
}

/// Compare an expected table against an actual query result.
///
/// Never fails: every mismatch is reported through the verdict.
pub fn compare(expected: &TableSpec, actual: &TableSpec) -> ComparisonVerdict {
    let column_names_match = expected.columns == actual.columns;

    let rows_matched = expected
        .rows
        .iter()
        .zip(actual.rows.iter())
        .filter(|(e, a)| rows_equal(e, a))
        .count();

    let expected_row_count = expected.rows.len();
    let actual_row_count = actual.rows.len();
    let expected_column_count = expected.columns.len();
    let actual_column_count = actual.columns.len();

    let passed = expected_column_count == actual_column_count
        && column_names_match
        && expected_row_count == actual_row_count
        && rows_matched == expected_row_count;

    ComparisonVerdict {
        passed,
        column_names_match,
        expected_column_count,
        actual_column_count,
        expected_row_count,
        actual_row_count,
        rows_matched,
        expected_columns: expected.columns.clone(),
        actual_columns: actual.columns.clone(),
    }
}
