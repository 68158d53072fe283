//! Column type inference

use std::collections::HashMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use serde::Serialize;

use crate::models::{Cell, TableSpec};

/// SQL storage type of a generated column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    /// Whole numbers and booleans (stored as 0/1)
    Integer,

    /// Floating point
    Real,

    /// Everything else
    Text,
}

impl SqlType {
    /// Type for a single cell
    pub fn of(cell: &Cell) -> Self {
        match cell {
            Cell::Integer(_) | Cell::Bool(_) => SqlType::Integer,
            Cell::Real(_) => SqlType::Real,
            Cell::Null | Cell::Text(_) => SqlType::Text,
        }
    }

    /// SQL keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }
}

impl Display for SqlType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Infer one SQL type per column from the table's first row.
///
/// Later rows are never consulted. Columns past the end of the first row
/// get no entry, and callers treat a missing entry as `TEXT`.
pub fn infer_types(table: &TableSpec) -> HashMap<String, SqlType> {
    let first_row = match table.rows.first() {
        Some(row) => row,
        None => return HashMap::new(),
    };

    table
        .columns
        .iter()
        .zip(first_row.iter())
        .map(|(column, cell)| (column.clone(), SqlType::of(cell)))
        .collect()
}

/// Type of one column, defaulting to `TEXT`
pub fn column_type(types: &HashMap<String, SqlType>, column: &str) -> SqlType {
    types.get(column).copied().unwrap_or(SqlType::Text)
}
