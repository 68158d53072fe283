//! SQLite-backed query engine
//!
//! Runs generated setup scripts and learner queries against an in-memory
//! SQLite database and reads results back as normalized tables.

use log::debug;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use sql_challenge_core::compare::{EngineError, QueryEngine};
use sql_challenge_core::models::{Cell, TableSpec};

/// In-memory SQLite database
pub struct SqliteEngine {
    conn: Connection,
}

impl SqliteEngine {
    /// Open a fresh in-memory database
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Ok(SqliteEngine {
            conn: Connection::open_in_memory()?,
        })
    }
}

fn to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(v) => Cell::Integer(v),
        ValueRef::Real(v) => Cell::real(v),
        ValueRef::Text(t) => Cell::text(String::from_utf8_lossy(t)),
        ValueRef::Blob(b) => Cell::text(String::from_utf8_lossy(b)),
    }
}

fn engine_error(err: rusqlite::Error) -> EngineError {
    EngineError::new(err.to_string())
}

impl QueryEngine for SqliteEngine {
    fn execute(&mut self, sql: &str) -> Result<(), EngineError> {
        debug!("execute: {}", sql);
        self.conn.execute_batch(sql).map_err(engine_error)
    }

    fn query(&mut self, sql: &str) -> Result<TableSpec, EngineError> {
        debug!("query: {}", sql);
        let mut stmt = self.conn.prepare(sql).map_err(engine_error)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(engine_error)?;
        while let Some(row) = cursor.next().map_err(engine_error)? {
            let cells = (0..width)
                .map(|i| row.get_ref(i).map(to_cell))
                .collect::<rusqlite::Result<Vec<Cell>>>()
                .map_err(engine_error)?;
            rows.push(cells);
        }

        Ok(TableSpec::new("", columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sql_challenge_core::{assemble_json, evaluate, materialize};

    const DOCUMENT: &str = r#"{
        "title": "Honor roll",
        "description": "Students with a GPA above 3",
        "expected_query": "SELECT name FROM students WHERE gpa > 3 ORDER BY id",
        "sample_table": {
            "name": "students",
            "columns": ["id", "name", "gpa"],
            "rows": ["[1, \"Maria\", 3.5]", [2, "O'Brien", 2.5], {"id": 3, "name": "Jose", "gpa": 3.75}]
        },
        "expected_result": {
            "columns": ["name"],
            "rows": [["Maria"], ["Jose"]]
        }
    }"#;

    #[test]
    fn test_query_reads_columns_and_cells() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        let result = engine
            .query("SELECT 1 AS a, 2.5 AS b, 'x' AS c, NULL AS d, 4.0 AS e")
            .unwrap();

        assert_eq!(result.columns, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(
            result.rows,
            vec![vec![
                Cell::Integer(1),
                Cell::Real(2.5),
                Cell::text("x"),
                Cell::Null,
                Cell::Integer(4),
            ]]
        );
    }

    #[test]
    fn test_errors_carry_sqlite_message() {
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        let err = engine.query("SELECT * FROM missing").unwrap_err();
        assert!(err.message().contains("no such table"));
        assert!(engine.execute("CREATE TABLE").is_err());
    }

    #[test]
    fn test_materialize_then_query() {
        let challenge = assemble_json(DOCUMENT).unwrap().challenge;
        let mut engine = SqliteEngine::open_in_memory().unwrap();
        assert_eq!(materialize(&mut engine, &challenge).unwrap(), 4);

        let result = engine.query("SELECT name FROM students WHERE id = 2").unwrap();
        assert_eq!(result.rows, vec![vec![Cell::text("O'Brien")]]);
    }

    #[test]
    fn test_reference_query_passes() {
        let challenge = assemble_json(DOCUMENT).unwrap().challenge;
        let mut engine = SqliteEngine::open_in_memory().unwrap();

        let evaluation = evaluate(&mut engine, &challenge, &challenge.expected_query);
        assert!(evaluation.passed(), "{}", evaluation.feedback());

        // a second run drops and recreates the tables
        let evaluation = evaluate(&mut engine, &challenge, &challenge.expected_query);
        assert!(evaluation.passed(), "{}", evaluation.feedback());
    }

    #[test]
    fn test_wrong_query_fails() {
        let challenge = assemble_json(DOCUMENT).unwrap().challenge;
        let mut engine = SqliteEngine::open_in_memory().unwrap();

        let evaluation = evaluate(&mut engine, &challenge, "SELECT name FROM students ORDER BY id");
        assert!(!evaluation.passed());
        assert_eq!(evaluation.feedback(), "Row count mismatch. Expected 2, got 3");

        let evaluation = evaluate(&mut engine, &challenge, "SELECT nme FROM students");
        assert!(evaluation.feedback().starts_with("Query failed: "));
    }
}
