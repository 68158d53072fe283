//! Challenge document assembly
//!
//! Only `title` is required. Every other field falls back to its default,
//! and a malformed table field degrades to an empty table, so that one bad
//! field in a hand-authored document does not hide the rest of it.

use std::collections::HashSet;
use log::{debug, warn};
use serde_json::{Map, Number, Value as JsonValue};
use thiserror::Error;

use crate::config::NormalizerConfig;
use crate::models::{Cell, ChallengeDefinition, ChallengeStatus, Difficulty, TableSpec, TestCase};
use super::row::{fit_row, normalize_row, RowFit};
use super::{kind_name, Diagnostic, DiagnosticKind, Diagnostics, Document};

/// Reason a whole document was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// No title field
    #[error("document has no title")]
    MissingTitle,

    /// Title present but blank
    #[error("document has a blank title")]
    BlankTitle,

    /// Title present but not a string
    #[error("document title must be a string, found {0}")]
    TitleNotText(&'static str),

    /// Document is not a keyed mapping
    #[error("document must be an object, found {0}")]
    NotAnObject(&'static str),
}

/// A challenge together with the problems found while assembling it
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    /// The assembled challenge
    pub challenge: ChallengeDefinition,

    /// Field-level problems, in processing order
    pub diagnostics: Vec<Diagnostic>,
}

impl Assembled {
    /// Whether the document assembled without any diagnostic
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Assemble a document with the default normalizer configuration
pub fn assemble(doc: &Document) -> Result<Assembled, AssemblyError> {
    ChallengeAssembler::default().assemble(doc)
}

/// Builds [`ChallengeDefinition`]s from raw documents
#[derive(Debug, Clone, Default)]
pub struct ChallengeAssembler {
    config: NormalizerConfig,
}

impl ChallengeAssembler {
    /// Create an assembler with the given row-shape policies
    pub fn new(config: NormalizerConfig) -> Self {
        ChallengeAssembler { config }
    }

    /// Assemble a document, taking its id from the `id` field if present
    pub fn assemble(&self, doc: &Document) -> Result<Assembled, AssemblyError> {
        let id = doc.get("id").and_then(JsonValue::as_str).unwrap_or_default();
        self.assemble_with_id(id, doc)
    }

    /// Assemble any JSON value, rejecting values that are not objects
    pub fn assemble_value(&self, id: &str, value: &JsonValue) -> Result<Assembled, AssemblyError> {
        match value {
            JsonValue::Object(doc) => self.assemble_with_id(id, doc),
            other => {
                let err = AssemblyError::NotAnObject(kind_name(other));
                warn!("rejecting challenge document '{}': {}", id, err);
                Err(err)
            }
        }
    }

    /// Assemble a document whose id is known to the caller
    pub fn assemble_with_id(&self, id: &str, doc: &Document) -> Result<Assembled, AssemblyError> {
        let title = match read_title(doc) {
            Ok(title) => title,
            Err(err) => {
                warn!("rejecting challenge document '{}': {}", id, err);
                return Err(err);
            }
        };

        let mut diags = Diagnostics::default();

        let difficulty = match string_field(doc, &["difficulty"], &mut diags) {
            None => Difficulty::default(),
            Some(raw) => Difficulty::parse(&raw).unwrap_or_else(|| {
                let default = Difficulty::default();
                diags.report(
                    "difficulty",
                    DiagnosticKind::UnknownValue {
                        found: raw,
                        default: default.as_str(),
                    },
                );
                default
            }),
        };

        let status = match string_field(doc, &["status"], &mut diags) {
            None => ChallengeStatus::default(),
            Some(raw) => ChallengeStatus::parse(&raw).unwrap_or_else(|| {
                let default = ChallengeStatus::default();
                diags.report(
                    "status",
                    DiagnosticKind::UnknownValue {
                        found: raw,
                        default: default.as_str(),
                    },
                );
                default
            }),
        };

        let expected_result =
            self.table(doc.get("expected_result"), "expected_result", false, &mut diags);
        let sample_table = self.table(doc.get("sample_table"), "sample_table", true, &mut diags);
        let additional_tables = self.additional_tables(doc, &mut diags);

        let mut tags = string_list(doc, "tags", &mut diags);
        let mut seen = HashSet::new();
        tags.retain(|tag| seen.insert(tag.clone()));

        let challenge = ChallengeDefinition {
            id: id.to_string(),
            title,
            description: string_field(doc, &["description"], &mut diags).unwrap_or_default(),
            difficulty,
            topic: string_field(doc, &["topic"], &mut diags).unwrap_or_default(),
            course_id: string_field(doc, &["courseId"], &mut diags).unwrap_or_default(),
            expected_query: string_field(doc, &["expected_query", "expectedQuery"], &mut diags)
                .unwrap_or_default(),
            expected_result,
            sample_table,
            additional_tables,
            hints: string_list(doc, "hints", &mut diags),
            tags,
            status,
            order: integer_field(doc, "order", &mut diags),
            author: string_field(doc, &["author"], &mut diags).unwrap_or_default(),
            created_at: string_field(doc, &["createdAt"], &mut diags).unwrap_or_default(),
            updated_at: string_field(doc, &["updatedAt"], &mut diags).unwrap_or_default(),
            test_cases: test_cases(doc, &mut diags),
            is_unlocked: true,
        };

        let diagnostics = diags.into_vec();
        debug!(
            "assembled challenge '{}' ({} table(s), {} diagnostic(s))",
            challenge.id,
            1 + challenge.additional_tables.len(),
            diagnostics.len()
        );

        Ok(Assembled {
            challenge,
            diagnostics,
        })
    }

    /// Assemble one table-bearing field.
    ///
    /// Materialized tables (sample and additional tables) must also have
    /// unique column names; expected results may repeat a name, as a SQL
    /// projection can.
    pub fn assemble_table(
        &self,
        raw: &JsonValue,
        location: &str,
        materialized: bool,
    ) -> (TableSpec, Vec<Diagnostic>) {
        let mut diags = Diagnostics::default();
        let table = self.table(Some(raw), location, materialized, &mut diags);
        (table, diags.into_vec())
    }

    fn additional_tables(&self, doc: &Document, diags: &mut Diagnostics) -> Vec<TableSpec> {
        let (key, raw) = match lookup(doc, &["additionalTables", "additional_tables"]) {
            Some(found) => found,
            None => return Vec::new(),
        };

        match raw {
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.table(Some(item), &format!("{}[{}]", key, i), true, diags))
                .collect(),
            other => {
                diags.report(
                    key,
                    DiagnosticKind::WrongType {
                        expected: "array",
                        found: kind_name(other),
                    },
                );
                Vec::new()
            }
        }
    }

    fn table(
        &self,
        raw: Option<&JsonValue>,
        location: &str,
        materialized: bool,
        diags: &mut Diagnostics,
    ) -> TableSpec {
        let map = match raw {
            None | Some(JsonValue::Null) => return TableSpec::default(),
            Some(JsonValue::Object(map)) => map,
            Some(other) => {
                diags.report(
                    location,
                    DiagnosticKind::MalformedTable(format!("expected object, found {}", kind_name(other))),
                );
                return TableSpec::default();
            }
        };

        let table = match self.read_table(map, location, diags) {
            Ok(table) => table,
            Err(reason) => {
                diags.report(location, DiagnosticKind::MalformedTable(reason));
                return TableSpec::default();
            }
        };

        if materialized {
            if let Err(err) = table.validate() {
                diags.report(location, DiagnosticKind::InvalidTable(err));
                return TableSpec::default();
            }
        }

        table
    }

    fn read_table(
        &self,
        map: &Map<String, JsonValue>,
        location: &str,
        diags: &mut Diagnostics,
    ) -> Result<TableSpec, String> {
        let name = match map.get("name") {
            None | Some(JsonValue::Null) => String::new(),
            Some(JsonValue::String(s)) => s.clone(),
            Some(other) => return Err(format!("name must be a string, found {}", kind_name(other))),
        };

        let columns = match map.get("columns") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    JsonValue::String(s) => Ok(s.clone()),
                    other => Err(format!(
                        "columns[{}] must be a string, found {}",
                        i,
                        kind_name(other)
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(format!("columns must be an array, found {}", kind_name(other)))
            }
        };

        let empty: &[JsonValue] = &[];
        let raw_rows = match map.get("rows") {
            None | Some(JsonValue::Null) => empty,
            Some(JsonValue::Array(items)) => items.as_slice(),
            Some(other) => return Err(format!("rows must be an array, found {}", kind_name(other))),
        };

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (i, raw) in raw_rows.iter().enumerate() {
            let row_location = format!("{}.rows[{}]", location, i);

            let normalized = match normalize_row(raw, &columns) {
                Ok(row) => row,
                Err(err) => {
                    diags.report(row_location, DiagnosticKind::RowDropped(err));
                    continue;
                }
            };

            match fit_row(normalized, columns.len(), &self.config) {
                Ok((row, fit)) => {
                    match fit {
                        RowFit::Exact => {}
                        RowFit::Padded { missing } => {
                            diags.report(row_location, DiagnosticKind::RowPadded { missing })
                        }
                        RowFit::Truncated { extra } => {
                            diags.report(row_location, DiagnosticKind::RowTruncated { extra })
                        }
                    }
                    rows.push(row);
                }
                Err(err) => diags.report(row_location, DiagnosticKind::RowDropped(err)),
            }
        }

        Ok(TableSpec::new(name, columns, rows))
    }
}

fn read_title(doc: &Document) -> Result<String, AssemblyError> {
    match doc.get("title") {
        None | Some(JsonValue::Null) => Err(AssemblyError::MissingTitle),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Err(AssemblyError::BlankTitle),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(other) => Err(AssemblyError::TitleNotText(kind_name(other))),
    }
}

/// First present, non-null field among `keys`
fn lookup<'a>(doc: &'a Document, keys: &[&'static str]) -> Option<(&'static str, &'a JsonValue)> {
    keys.iter()
        .find_map(|key| doc.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

fn string_field(doc: &Document, keys: &[&'static str], diags: &mut Diagnostics) -> Option<String> {
    let (key, value) = lookup(doc, keys)?;
    match value {
        JsonValue::String(s) => Some(s.clone()),
        other => {
            diags.report(
                key,
                DiagnosticKind::WrongType {
                    expected: "string",
                    found: kind_name(other),
                },
            );
            None
        }
    }
}

fn whole_number(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    match Cell::real(n.as_f64()?) {
        Cell::Integer(i) => Some(i),
        _ => None,
    }
}

fn integer_field(doc: &Document, key: &'static str, diags: &mut Diagnostics) -> i64 {
    let value = match lookup(doc, &[key]) {
        Some((_, value)) => value,
        None => return 0,
    };
    match value {
        JsonValue::Number(n) => whole_number(n).unwrap_or_else(|| {
            diags.report(
                key,
                DiagnosticKind::WrongType {
                    expected: "integer",
                    found: "fractional number",
                },
            );
            0
        }),
        other => {
            diags.report(
                key,
                DiagnosticKind::WrongType {
                    expected: "integer",
                    found: kind_name(other),
                },
            );
            0
        }
    }
}

fn string_list(doc: &Document, key: &'static str, diags: &mut Diagnostics) -> Vec<String> {
    let items = match lookup(doc, &[key]) {
        None => return Vec::new(),
        Some((_, JsonValue::Array(items))) => items,
        Some((_, other)) => {
            diags.report(
                key,
                DiagnosticKind::WrongType {
                    expected: "array",
                    found: kind_name(other),
                },
            );
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            JsonValue::String(s) => Some(s.clone()),
            other => {
                diags.report(
                    format!("{}[{}]", key, i),
                    DiagnosticKind::EntrySkipped(format!("expected string, found {}", kind_name(other))),
                );
                None
            }
        })
        .collect()
}

fn test_cases(doc: &Document, diags: &mut Diagnostics) -> Vec<TestCase> {
    let items = match lookup(doc, &["testCases"]) {
        None => return Vec::new(),
        Some((_, JsonValue::Array(items))) => items,
        Some((key, other)) => {
            diags.report(
                key,
                DiagnosticKind::WrongType {
                    expected: "array",
                    found: kind_name(other),
                },
            );
            return Vec::new();
        }
    };

    let mut cases = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let location = format!("testCases[{}]", i);
        match read_test_case(item) {
            Ok(case) => cases.push(case),
            Err(reason) => diags.report(location, DiagnosticKind::EntrySkipped(reason)),
        }
    }
    cases
}

fn read_test_case(item: &JsonValue) -> Result<TestCase, String> {
    let map = item
        .as_object()
        .ok_or_else(|| format!("expected object, found {}", kind_name(item)))?;

    let int = |key: &str| -> Result<i64, String> {
        match map.get(key) {
            None | Some(JsonValue::Null) => Ok(0),
            Some(JsonValue::Number(n)) => {
                whole_number(n).ok_or_else(|| format!("{} must be an integer", key))
            }
            Some(other) => Err(format!("{} must be an integer, found {}", key, kind_name(other))),
        }
    };
    let count = |key: &str| -> Result<usize, String> {
        usize::try_from(int(key)?).map_err(|_| format!("{} must not be negative", key))
    };

    Ok(TestCase {
        id: int("id")?,
        description: map
            .get("description")
            .and_then(JsonValue::as_str)
            .unwrap_or_default()
            .to_string(),
        expected_row_count: count("expectedRowCount")?,
        expected_column_count: count("expectedColumnCount")?,
    })
}
