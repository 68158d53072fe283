//! SQL statement generation
//!
//! This module renders `CREATE TABLE` and `INSERT` statements for a
//! [`TableSpec`], with column types taken from the type inferencer.

use log::debug;
use serde::Serialize;

use crate::models::{Cell, TableSpec};
use crate::utils::StringUtils;
use super::types::{column_type, infer_types};

/// What a generated statement does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum StatementKind {
    /// Create a table
    CreateTable {
        /// Table name
        table: String,
    },

    /// Insert one row
    Insert {
        /// Table name
        table: String,
        /// Index of the row in the table
        row: usize,
    },

    /// Drop a table
    DropTable {
        /// Table name
        table: String,
    },
}

/// A generated SQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlStatement {
    /// What the statement does
    pub kind: StatementKind,

    /// SQL text, without a trailing terminator
    pub sql: String,
}

impl SqlStatement {
    /// Create a statement for creating a table
    pub fn create_table(table: &str, sql: String) -> Self {
        SqlStatement {
            kind: StatementKind::CreateTable {
                table: table.to_string(),
            },
            sql,
        }
    }

    /// Create a statement for inserting a row
    pub fn insert(table: &str, row: usize, sql: String) -> Self {
        SqlStatement {
            kind: StatementKind::Insert {
                table: table.to_string(),
                row,
            },
            sql,
        }
    }

    /// Whether this is schema (DDL) rather than data (DML)
    pub fn is_ddl(&self) -> bool {
        !matches!(self.kind, StatementKind::Insert { .. })
    }

    /// Create the statement undoing this one, if there is one
    pub fn reverse(&self) -> Option<Self> {
        match &self.kind {
            StatementKind::CreateTable { table } => Some(SqlStatement {
                kind: StatementKind::DropTable {
                    table: table.clone(),
                },
                sql: format!("DROP TABLE IF EXISTS {}", table),
            }),
            StatementKind::Insert { .. } | StatementKind::DropTable { .. } => None,
        }
    }
}

fn is_generatable(table: &TableSpec) -> bool {
    !table.name.is_empty() && !table.columns.is_empty()
}

/// Render `CREATE TABLE IF NOT EXISTS`.
///
/// Returns an empty string when the table has no name or no columns.
pub fn generate_create_table(table: &TableSpec) -> String {
    if !is_generatable(table) {
        return String::new();
    }

    let types = infer_types(table);
    let definitions: Vec<String> = table
        .columns
        .iter()
        .map(|column| format!("{} {}", column, column_type(&types, column)))
        .collect();

    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        table.name,
        definitions.join(", ")
    )
}

/// Render one `INSERT` per row, in row order.
///
/// Each statement carries exactly one value per declared column; a
/// position the row does not fill is rendered as `NULL`. Returns nothing
/// when the table has no name or no columns.
pub fn generate_inserts(table: &TableSpec) -> Vec<String> {
    if !is_generatable(table) {
        return Vec::new();
    }

    let column_list = table.columns.join(", ");
    let inserts: Vec<String> = table
        .rows
        .iter()
        .map(|row| {
            let values: Vec<String> = (0..table.columns.len())
                .map(|i| render_value(row.get(i)))
                .collect();
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table.name,
                column_list,
                values.join(", ")
            )
        })
        .collect();

    debug!("generated {} insert(s) for table {}", inserts.len(), table.name);
    inserts
}

/// Render a cell as a SQL literal
pub fn render_value(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Cell::Null) => "NULL".to_string(),
        Some(Cell::Bool(v)) => if *v { "1" } else { "0" }.to_string(),
        Some(Cell::Integer(v)) => v.to_string(),
        Some(Cell::Real(v)) if v.is_finite() => v.to_string(),
        Some(Cell::Real(_)) => "NULL".to_string(),
        Some(Cell::Text(v)) => StringUtils::quote_literal(v),
    }
}

/// DDL followed by all DML for one table
pub fn table_statements(table: &TableSpec) -> Vec<SqlStatement> {
    let create = generate_create_table(table);
    if create.is_empty() {
        return Vec::new();
    }

    std::iter::once(SqlStatement::create_table(&table.name, create))
        .chain(
            generate_inserts(table)
                .into_iter()
                .enumerate()
                .map(|(i, sql)| SqlStatement::insert(&table.name, i, sql)),
        )
        .collect()
}
