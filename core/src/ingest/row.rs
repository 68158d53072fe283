//! Row normalization
//!
//! Challenge documents are hand-authored, and one row may arrive in any of
//! three encodings:
//!
//! - text holding a JSON array literal: `"[1, \"Maria\", 21]"`
//! - a native sequence: `[1, "Maria", 21]`
//! - a keyed map: `{"id": 1, "name": "Maria", "age": 21}`
//!
//! The encoding is picked from the runtime shape of the value, in
//! [`RowEncoding::detect`], and nowhere else.

use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use crate::config::{LongRowPolicy, NormalizerConfig, ShortRowPolicy};
use crate::models::{Cell, NormalizedRow};

/// Row normalization error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Text encoding without the surrounding brackets
    #[error("row text must start with '[' and end with ']'")]
    MissingBrackets,

    /// Text encoding that is not a valid JSON array
    #[error("row text is not a valid JSON array: {0}")]
    InvalidJson(String),

    /// Value that is neither text, sequence nor map
    #[error("unsupported row encoding: {0}")]
    UnsupportedEncoding(&'static str),

    /// Row shorter than the declared columns, rejected by policy
    #[error("row has {found} cells but the table declares {expected} columns")]
    TooShort {
        /// Declared column count
        expected: usize,
        /// Cells present
        found: usize,
    },

    /// Row longer than the declared columns, rejected by policy
    #[error("row has {found} cells but the table declares only {expected} columns")]
    TooLong {
        /// Declared column count
        expected: usize,
        /// Cells present
        found: usize,
    },
}

/// Encoding of one raw row
#[derive(Debug, Clone, Copy)]
pub enum RowEncoding<'a> {
    /// JSON array literal held in a string
    Text(&'a str),

    /// Native ordered sequence
    Sequence(&'a [JsonValue]),

    /// Keyed map
    Map(&'a Map<String, JsonValue>),
}

impl<'a> RowEncoding<'a> {
    /// Detect the encoding from the value's runtime shape
    pub fn detect(raw: &'a JsonValue) -> Result<Self, RowError> {
        match raw {
            JsonValue::String(s) => Ok(RowEncoding::Text(s)),
            JsonValue::Array(items) => Ok(RowEncoding::Sequence(items)),
            JsonValue::Object(map) => Ok(RowEncoding::Map(map)),
            JsonValue::Null => Err(RowError::UnsupportedEncoding("null")),
            JsonValue::Bool(_) => Err(RowError::UnsupportedEncoding("boolean")),
            JsonValue::Number(_) => Err(RowError::UnsupportedEncoding("number")),
        }
    }

    /// Normalize the row against a column ordering
    pub fn normalize(self, columns: &[String]) -> Result<NormalizedRow, RowError> {
        match self {
            RowEncoding::Text(text) => normalize_text(text),
            RowEncoding::Sequence(items) => Ok(items.iter().map(Cell::from_json).collect()),
            RowEncoding::Map(map) => Ok(normalize_map(map, columns)),
        }
    }
}

/// Normalize one raw row.
///
/// Sequence rows are never padded or cut here, so the result may be
/// shorter or longer than `columns`; see [`fit_row`].
pub fn normalize_row(raw: &JsonValue, columns: &[String]) -> Result<NormalizedRow, RowError> {
    RowEncoding::detect(raw)?.normalize(columns)
}

/// Re-normalize cells that are already typed. Idempotent.
pub fn normalize_cells(row: &[Cell]) -> NormalizedRow {
    row.iter().cloned().map(Cell::normalized).collect()
}

fn normalize_text(text: &str) -> Result<NormalizedRow, RowError> {
    let trimmed = text.trim();
    if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
        return Err(RowError::MissingBrackets);
    }

    let items: Vec<JsonValue> =
        serde_json::from_str(trimmed).map_err(|e| RowError::InvalidJson(e.to_string()))?;

    Ok(items.iter().map(Cell::from_json).collect())
}

/// Without columns the map's own iteration order is used, which is not a
/// portable ordering.
fn normalize_map(map: &Map<String, JsonValue>, columns: &[String]) -> NormalizedRow {
    if columns.is_empty() {
        return map.values().map(Cell::from_json).collect();
    }

    columns
        .iter()
        .map(|column| match map.get(column) {
            Some(value) => Cell::from_json(value),
            None => Cell::Text(String::new()),
        })
        .collect()
}

/// How a row was brought to the declared column count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFit {
    /// Already the right length
    Exact,

    /// Missing trailing cells were filled with `Null`
    Padded {
        /// Cells added
        missing: usize,
    },

    /// Extra trailing cells were dropped
    Truncated {
        /// Cells removed
        extra: usize,
    },
}

/// Bring a normalized row to `column_count` cells according to policy.
///
/// A table without declared columns has nothing to fit against, and its
/// rows are returned unchanged.
pub fn fit_row(
    mut row: NormalizedRow,
    column_count: usize,
    config: &NormalizerConfig,
) -> Result<(NormalizedRow, RowFit), RowError> {
    let found = row.len();
    if column_count == 0 || found == column_count {
        return Ok((row, RowFit::Exact));
    }

    if found < column_count {
        match config.short_rows {
            ShortRowPolicy::PadWithNull => {
                row.resize(column_count, Cell::Null);
                Ok((row, RowFit::Padded { missing: column_count - found }))
            }
            ShortRowPolicy::Reject => Err(RowError::TooShort {
                expected: column_count,
                found,
            }),
        }
    } else {
        match config.long_rows {
            LongRowPolicy::Truncate => {
                row.truncate(column_count);
                Ok((row, RowFit::Truncated { extra: found - column_count }))
            }
            LongRowPolicy::Reject => Err(RowError::TooLong {
                expected: column_count,
                found,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|c| c.to_string()).collect()
    }

    fn maria() -> NormalizedRow {
        vec![Cell::Integer(1), Cell::text("Maria"), Cell::Integer(21)]
    }

    #[rstest]
    #[case(json!("[1, \"Maria\", 21]"))]
    #[case(json!("  [1, \"Maria\", 21.0]  "))]
    #[case(json!([1, "Maria", 21]))]
    #[case(json!([1.0, "Maria", 21.0]))]
    #[case(json!({"name": "Maria", "id": 1, "age": 21}))]
    fn test_all_encodings_agree(#[case] raw: JsonValue) {
        let row = normalize_row(&raw, &cols(&["id", "name", "age"])).unwrap();
        assert_eq!(row, maria());
        assert!(row.iter().all(|c| !matches!(c, Cell::Real(_))));
    }

    #[rstest]
    #[case(json!("1, 2, 3"), RowError::MissingBrackets)]
    #[case(json!("[1, 2, 3"), RowError::MissingBrackets)]
    #[case(json!(""), RowError::MissingBrackets)]
    #[case(json!(42), RowError::UnsupportedEncoding("number"))]
    #[case(json!(true), RowError::UnsupportedEncoding("boolean"))]
    #[case(json!(null), RowError::UnsupportedEncoding("null"))]
    fn test_rejected_rows(#[case] raw: JsonValue, #[case] expected: RowError) {
        assert_eq!(normalize_row(&raw, &[]), Err(expected));
    }

    #[test]
    fn test_invalid_json_text() {
        let err = normalize_row(&json!("[1, 'Maria', 21]"), &[]).unwrap_err();
        assert!(matches!(err, RowError::InvalidJson(_)));

        let err = normalize_row(&json!("[1] [2]"), &[]).unwrap_err();
        assert!(matches!(err, RowError::InvalidJson(_)));
    }

    #[test]
    fn test_map_missing_key_becomes_empty_text() {
        let row = normalize_row(&json!({"id": 7}), &cols(&["id", "name"])).unwrap();
        assert_eq!(row, vec![Cell::Integer(7), Cell::text("")]);
    }

    #[test]
    fn test_map_without_columns_uses_map_order() {
        let raw = json!({"b": 2, "a": 1});
        let row = normalize_row(&raw, &[]).unwrap();
        let expected: NormalizedRow = raw
            .as_object()
            .unwrap()
            .values()
            .map(Cell::from_json)
            .collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row, expected);
    }

    #[test]
    fn test_sequence_ignores_columns_and_is_not_padded() {
        let row = normalize_row(&json!([1, null]), &cols(&["id", "name", "age"])).unwrap();
        assert_eq!(row, vec![Cell::Integer(1), Cell::text("")]);
    }

    #[test]
    fn test_nested_values_keep_json_text() {
        let row = normalize_row(&json!([[1, 2], {"k": "v"}]), &[]).unwrap();
        assert_eq!(row, vec![Cell::text("[1,2]"), Cell::text("{\"k\":\"v\"}")]);
    }

    #[test]
    fn test_fit_row_policies() {
        let lenient = NormalizerConfig::default();
        let strict = NormalizerConfig {
            short_rows: ShortRowPolicy::Reject,
            long_rows: LongRowPolicy::Reject,
        };

        let (row, fit) = fit_row(vec![Cell::Integer(1)], 3, &lenient).unwrap();
        assert_eq!(row, vec![Cell::Integer(1), Cell::Null, Cell::Null]);
        assert_eq!(fit, RowFit::Padded { missing: 2 });

        let (row, fit) = fit_row(maria(), 2, &lenient).unwrap();
        assert_eq!(row, vec![Cell::Integer(1), Cell::text("Maria")]);
        assert_eq!(fit, RowFit::Truncated { extra: 1 });

        assert_eq!(
            fit_row(vec![Cell::Integer(1)], 3, &strict),
            Err(RowError::TooShort { expected: 3, found: 1 })
        );
        assert_eq!(
            fit_row(maria(), 2, &strict),
            Err(RowError::TooLong { expected: 2, found: 3 })
        );

        assert_eq!(fit_row(maria(), 3, &strict).unwrap().1, RowFit::Exact);
        assert_eq!(fit_row(maria(), 0, &strict).unwrap().1, RowFit::Exact);
    }

    #[test]
    fn test_normalize_cells_collapses_reals() {
        let row = normalize_cells(&[Cell::Real(21.0), Cell::Real(2.5), Cell::Bool(true)]);
        assert!(matches!(row[0], Cell::Integer(21)));
        assert!(matches!(row[1], Cell::Real(v) if v == 2.5));
        assert!(matches!(row[2], Cell::Bool(true)));
    }

    fn raw_cell() -> impl Strategy<Value = JsonValue> {
        prop_oneof![
            Just(JsonValue::Null),
            any::<bool>().prop_map(JsonValue::Bool),
            any::<i64>().prop_map(JsonValue::from),
            (-4_000_000i64..4_000_000i64).prop_map(|n| JsonValue::from(n as f64 / 8.0)),
            "[a-zA-Z' ]{0,12}".prop_map(JsonValue::from),
        ]
    }

    proptest! {
        #[test]
        fn prop_normalizing_normalized_row_is_noop(items in prop::collection::vec(raw_cell(), 0..8)) {
            let once = normalize_row(&JsonValue::Array(items), &[]).unwrap();

            let again = normalize_cells(&once);
            prop_assert_eq!(&again, &once);

            let as_json = JsonValue::Array(once.iter().map(Cell::to_json).collect());
            let reparsed = normalize_row(&as_json, &[]).unwrap();
            prop_assert_eq!(&reparsed, &once);
            for (a, b) in reparsed.iter().zip(once.iter()) {
                prop_assert_eq!(a.cell_type(), b.cell_type());
            }
        }

        #[test]
        fn prop_text_and_sequence_encodings_agree(items in prop::collection::vec(raw_cell(), 0..8)) {
            let sequence = JsonValue::Array(items);
            let text = JsonValue::String(sequence.to_string());
            prop_assert_eq!(
                normalize_row(&sequence, &[]).unwrap(),
                normalize_row(&text, &[]).unwrap()
            );
        }
    }
}
