//! Subcommand implementations
//!
//! Each command reads a challenge document from disk, runs it through the
//! core pipeline and returns text or a verdict for `main` to print.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::fs;

use log::info;
use serde_json::Value as JsonValue;

use sql_challenge_core::compare::{compare, evaluate_with, ComparisonVerdict, Evaluation};
use sql_challenge_core::config::{DisplayConfig, EngineConfig};
use sql_challenge_core::ingest::{Assembled, ChallengeAssembler};
use sql_challenge_core::models::{ChallengeDefinition, NormalizedRow, TableSpec};
use sql_challenge_core::schema::{render_script, setup_script};
use sql_challenge_core::utils::measure_time;
use sql_challenge_core::CoreError;

use crate::engine::SqliteEngine;
use crate::error::{CliError, Result};

fn read_json(path: &str) -> Result<JsonValue> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let value = serde_json::from_str(&text).map_err(CoreError::from)?;
    Ok(value)
}

/// Read and assemble a challenge document
pub fn load_challenge(path: &str, config: &EngineConfig) -> Result<Assembled> {
    let value = read_json(path)?;
    let assembler = ChallengeAssembler::new(config.normalizer.clone());

    let assembled = measure_time("assemble", || match &value {
        JsonValue::Object(doc) => assembler.assemble(doc),
        other => assembler.assemble_value("", other),
    })
    .map_err(CoreError::from)?;

    info!(
        "loaded challenge '{}' from {} ({} diagnostic(s))",
        assembled.challenge.title,
        path,
        assembled.diagnostics.len()
    );
    Ok(assembled)
}

/// Setup script for a challenge
pub fn setup(challenge: &ChallengeDefinition) -> String {
    render_script(&setup_script(challenge))
}

/// Human-readable report on an assembled challenge
pub fn inspect(assembled: &Assembled, display: &DisplayConfig) -> Result<String> {
    let challenge = &assembled.challenge;
    let mut out = String::new();

    let json = serde_json::to_string_pretty(challenge).map_err(CoreError::from)?;
    let _ = writeln!(out, "{}", json);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} [{}] {}",
        challenge.title,
        challenge.difficulty,
        challenge.description_preview(display.description_preview_chars)
    );
    if !challenge.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", challenge.tags_string());
    }
    let _ = writeln!(out, "Usable: {}", if challenge.is_usable() { "yes" } else { "no" });

    if assembled.is_clean() {
        let _ = writeln!(out, "Diagnostics: none");
    } else {
        let _ = writeln!(out, "Diagnostics:");
        for diagnostic in &assembled.diagnostics {
            let _ = writeln!(out, "  {}", diagnostic);
        }
    }

    for table in challenge.all_tables() {
        if table.name.is_empty() && table.columns.is_empty() {
            continue;
        }
        let _ = writeln!(out);
        out.push_str(&table.preview(display.preview_rows));
    }

    Ok(out)
}

/// Pick the learner query from `--query` or `--query-file`
pub fn read_query(query: Option<String>, query_file: Option<&str>) -> Result<String> {
    match (query, query_file) {
        (Some(query), _) => Ok(query),
        (None, Some(path)) => fs::read_to_string(path).map_err(|e| CliError::io(path, e)),
        (None, None) => Err(CliError::MissingQuery),
    }
}

fn row_order(a: &NormalizedRow, b: &NormalizedRow) -> Ordering {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

fn sorted(table: &TableSpec) -> TableSpec {
    let mut table = table.clone();
    table.rows.sort_by(row_order);
    table
}

/// Compare two tables, ignoring row order when `unordered` is set
pub fn judge(expected: &TableSpec, actual: &TableSpec, unordered: bool) -> ComparisonVerdict {
    if unordered {
        compare(&sorted(expected), &sorted(actual))
    } else {
        compare(expected, actual)
    }
}

/// Evaluate a query against a fresh in-memory SQLite database
pub fn run(challenge: &ChallengeDefinition, query: &str, unordered: bool) -> Result<Evaluation> {
    let mut engine = SqliteEngine::open_in_memory()?;
    Ok(measure_time("evaluate", || {
        evaluate_with(&mut engine, challenge, query, |expected, actual| {
            judge(expected, actual, unordered)
        })
    }))
}

/// Compare a challenge's expected result against a `{columns, rows}` file
pub fn compare_file(
    challenge: &ChallengeDefinition,
    path: &str,
    config: &EngineConfig,
    unordered: bool,
) -> Result<ComparisonVerdict> {
    let value = read_json(path)?;
    if !value.is_object() {
        return Err(CliError::InvalidResult(format!("{} is not a JSON object", path)));
    }

    let assembler = ChallengeAssembler::new(config.normalizer.clone());
    let (actual, diagnostics) = assembler.assemble_table(&value, "actual", false);
    if !diagnostics.is_empty() {
        info!("{} row(s) of {} needed reconciling", diagnostics.len(), path);
    }

    Ok(judge(&challenge.expected_result, &actual, unordered))
}
