//! Canonical table representation
//!
//! This module provides [`TableSpec`], the in-memory table every challenge
//! field (sample table, additional tables, expected result) is reduced to.

use std::collections::HashSet;
use std::fmt::Write as _;
use serde::Serialize;
use thiserror::Error;

use super::cell::{Cell, NormalizedRow};

/// Table validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// Column declared more than once
    #[error("Column {0} is declared more than once in table {1}")]
    DuplicateColumn(String, String),
}

/// A named table with ordered columns and normalized rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableSpec {
    /// Name of the table; empty for expected results
    pub name: String,

    /// Column names, in declared order
    pub columns: Vec<String>,

    /// Normalized rows, in document order
    pub rows: Vec<NormalizedRow>,
}

impl TableSpec {
    /// Create a new table
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<NormalizedRow>) -> Self {
        TableSpec {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Create a table from string column names, handy for results
    pub fn with_columns(name: impl Into<String>, columns: &[&str]) -> Self {
        TableSpec {
            name: name.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Number of declared columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether name, columns and rows are all empty
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.columns.is_empty() && self.rows.is_empty()
    }

    /// Check structural invariants (unique column names)
    pub fn validate(&self) -> Result<(), TableError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.as_str()) {
                return Err(TableError::DuplicateColumn(column.clone(), self.name.clone()));
            }
        }
        Ok(())
    }

    /// Render a short text preview of the table
    pub fn preview(&self, max_rows: usize) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Table: {}", self.name);
        let _ = writeln!(out, "Columns: {}", self.columns.join(", "));
        let _ = writeln!(out, "Rows: {}", self.rows.len());

        if !self.rows.is_empty() {
            out.push_str("\nSample Data:\n");
            for row in self.rows.iter().take(max_rows) {
                let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                out.push_str(&line.join(" | "));
                out.push('\n');
            }
            if self.rows.len() > max_rows {
                let _ = writeln!(out, "... ({} more rows)", self.rows.len() - max_rows);
            }
        }

        out
    }
}
