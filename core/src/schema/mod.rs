//! SQL schema and data generation
//!
//! This module turns normalized tables into the statements an embedded
//! query engine needs before a learner's query can run: column type
//! inference, `CREATE TABLE`/`INSERT` rendering, and per-challenge scripts.

mod types;
mod ddl;
mod script;

pub use types::{column_type, infer_types, SqlType};
pub use ddl::{
    generate_create_table, generate_inserts, render_value, table_statements, SqlStatement,
    StatementKind,
};
pub use script::{render_script, setup_script, teardown_script};
