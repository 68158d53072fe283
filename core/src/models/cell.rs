//! Normalized cell values
//!
//! A [`Cell`] is the only value type that flows past the row normalizer.
//! Loosely typed document values are converted exactly once, at ingestion.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Type tag of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CellType {
    /// Null value
    Null,

    /// Boolean
    Bool,

    /// Integer (64-bit)
    Integer,

    /// Floating point (64-bit)
    Real,

    /// Text string
    Text,
}

/// One normalized value
///
/// A real with a zero fractional part is never stored as `Real`; it is
/// collapsed to `Integer` on construction through [`Cell::from_json`],
/// [`Cell::real`] or [`Cell::normalized`].
#[derive(Clone, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// Null value
    Null,

    /// Boolean
    Bool(bool),

    /// Integer (64-bit)
    Integer(i64),

    /// Floating point (64-bit), always with a non-zero fractional part
    Real(f64),

    /// Text string
    Text(String),
}

/// Ordered sequence of cells produced against a column ordering
pub type NormalizedRow = Vec<Cell>;

impl Debug for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Cell::Null => write!(f, "Null"),
            Cell::Bool(v) => write!(f, "Bool({})", v),
            Cell::Integer(v) => write!(f, "Integer({})", v),
            Cell::Real(v) => write!(f, "Real({})", v),
            Cell::Text(v) => {
                if v.chars().count() > 20 {
                    let head: String = v.chars().take(20).collect();
                    write!(f, "Text(\"{}...\")", head)
                } else {
                    write!(f, "Text(\"{}\")", v)
                }
            }
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Cell::Null => write!(f, "NULL"),
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Real(v) => write!(f, "{}", v),
            Cell::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Numeric value of a cell for comparison.
///
/// Whole reals inside the `i64` range become `Exact`, so every value that
/// has an integer form is compared as an integer.
#[derive(Debug, Clone, Copy)]
enum Numeric {
    Exact(i64),
    Float(f64),
}

impl Numeric {
    /// Total order matching the real-number order, with every NaN last.
    fn cmp(self, other: Numeric) -> Ordering {
        match (self, other) {
            (Numeric::Exact(a), Numeric::Exact(b)) => a.cmp(&b),
            (Numeric::Float(a), Numeric::Float(b)) => match (a.is_nan(), b.is_nan()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            },
            (Numeric::Exact(a), Numeric::Float(b)) => exact_float_cmp(a, b),
            (Numeric::Float(a), Numeric::Exact(b)) => exact_float_cmp(b, a).reverse(),
        }
    }
}

/// Order an integer against a float that has no integer form.
///
/// Such a float is non-whole, and so smaller in magnitude than 2^53, or it
/// lies outside the `i64` range. Rounding the integer to `f64` keeps the
/// order in both cases, except for a tie with a float at 2^63 or beyond.
fn exact_float_cmp(a: i64, b: f64) -> Ordering {
    if b.is_nan() {
        return Ordering::Less;
    }
    match (a as f64).partial_cmp(&b) {
        Some(Ordering::Equal) | None => {
            if b > 0.0 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
        Some(ord) => ord,
    }
}

/// Integer form of a float, if it is whole and inside the `i64` range
fn whole_i64(value: f64) -> Option<i64> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < i64::MAX as f64
    {
        Some(value as i64)
    } else {
        None
    }
}

/// Cells compare after normalization: integers and reals compare by exact
/// numeric value, and a boolean compares equal to its 0/1 projection.
impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Cell {
    /// Normalize one raw document value.
    ///
    /// Numbers with a zero fractional part become `Integer`, other numbers
    /// `Real`. `null` becomes an empty `Text`, and arrays or objects keep
    /// their JSON text.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Cell::Text(String::new()),
            JsonValue::Bool(b) => Cell::Bool(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Cell::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    Cell::real(f)
                } else {
                    Cell::Text(n.to_string())
                }
            }
            JsonValue::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    /// Build a numeric cell from a float, collapsing whole numbers.
    pub fn real(value: f64) -> Self {
        match whole_i64(value) {
            Some(n) => Cell::Integer(n),
            None => Cell::Real(value),
        }
    }

    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Re-apply the numeric collapse. Idempotent.
    pub fn normalized(self) -> Self {
        match self {
            Cell::Real(v) => Cell::real(v),
            other => other,
        }
    }

    /// Get the type tag of the cell
    pub fn cell_type(&self) -> CellType {
        match self {
            Cell::Null => CellType::Null,
            Cell::Bool(_) => CellType::Bool,
            Cell::Integer(_) => CellType::Integer,
            Cell::Real(_) => CellType::Real,
            Cell::Text(_) => CellType::Text,
        }
    }

    /// Exact integer projection: booleans as 0/1, and reals only when whole
    /// and inside the `i64` range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Bool(v) => Some(i64::from(*v)),
            Cell::Integer(v) => Some(*v),
            Cell::Real(v) => whole_i64(*v),
            Cell::Null | Cell::Text(_) => None,
        }
    }

    fn numeric(&self) -> Option<Numeric> {
        match self {
            Cell::Real(v) => Some(whole_i64(*v).map_or(Numeric::Float(*v), Numeric::Exact)),
            other => other.as_i64().map(Numeric::Exact),
        }
    }

    /// Total order over cells, consistent with equality.
    ///
    /// `Null` sorts first, then numbers (booleans as 0/1, NaN last), then
    /// text by byte order.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        fn rank(cell: &Cell) -> u8 {
            match cell {
                Cell::Null => 0,
                Cell::Bool(_) | Cell::Integer(_) | Cell::Real(_) => 1,
                Cell::Text(_) => 2,
            }
        }

        match (self, other) {
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            _ => match (self.numeric(), other.numeric()) {
                (Some(a), Some(b)) => a.cmp(b),
                _ => rank(self).cmp(&rank(other)),
            },
        }
    }

    /// Whether the cell is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Convert back to a JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            Cell::Null => JsonValue::Null,
            Cell::Bool(v) => JsonValue::Bool(*v),
            Cell::Integer(v) => JsonValue::from(*v),
            Cell::Real(v) => serde_json::Number::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Cell::Text(v) => JsonValue::String(v.clone()),
        }
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Integer(value as i64)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::real(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(21), Cell::Integer(21))]
    #[case(json!(21.0), Cell::Integer(21))]
    #[case(json!(-3.0), Cell::Integer(-3))]
    #[case(json!(2.5), Cell::Real(2.5))]
    #[case(json!(true), Cell::Bool(true))]
    #[case(json!(null), Cell::Text(String::new()))]
    #[case(json!("Maria"), Cell::Text("Maria".to_string()))]
    #[case(json!({"a": 1}), Cell::Text("{\"a\":1}".to_string()))]
    fn test_from_json(#[case] raw: JsonValue, #[case] expected: Cell) {
        let cell = Cell::from_json(&raw);
        assert_eq!(cell, expected);
        assert_eq!(cell.cell_type(), expected.cell_type());
    }

    #[test]
    fn test_numeric_collapse_is_identical() {
        let a = Cell::from_json(&json!(21.0));
        let b = Cell::from_json(&json!(21));
        assert!(matches!(a, Cell::Integer(21)));
        assert!(matches!(b, Cell::Integer(21)));
    }

    #[test]
    fn test_cross_type_equality() {
        assert_eq!(Cell::Integer(21), Cell::Real(21.0));
        assert_eq!(Cell::Bool(true), Cell::Integer(1));
        assert_eq!(Cell::Bool(false), Cell::Integer(0));
        assert_ne!(Cell::Bool(true), Cell::Integer(2));
        assert_ne!(Cell::Text("21".to_string()), Cell::Integer(21));
        assert_ne!(Cell::Null, Cell::Text(String::new()));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let above = Cell::Integer(9_007_199_254_740_993);
        let at = Cell::Integer(9_007_199_254_740_992);
        assert_ne!(above, at);
        assert_ne!(above, Cell::Real(9_007_199_254_740_992.0));
        assert_eq!(at, Cell::Real(9_007_199_254_740_992.0));
        assert_ne!(Cell::Integer(i64::MAX), Cell::Real(i64::MAX as f64));
        assert_ne!(Cell::Integer(2), Cell::Real(2.5));
        assert_eq!(above.total_cmp(&at), Ordering::Greater);
    }

    #[test]
    fn test_total_order_ranks() {
        let mut cells = vec![
            Cell::text("b"),
            Cell::Real(f64::NAN),
            Cell::Integer(3),
            Cell::Null,
            Cell::Real(2.5),
            Cell::text("a"),
            Cell::Bool(true),
        ];
        cells.sort_by(Cell::total_cmp);
        assert_eq!(
            format!("{:?}", cells),
            "[Null, Bool(true), Real(2.5), Integer(3), Real(NaN), Text(\"a\"), Text(\"b\")]"
        );
    }

    #[test]
    fn test_large_whole_floats_stay_real() {
        assert!(matches!(Cell::real(1e300), Cell::Real(_)));
        assert!(matches!(Cell::real(f64::NAN), Cell::Real(_)));
    }

    #[test]
    fn test_debug_truncates_long_text() {
        let cell = Cell::text("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(format!("{:?}", cell), "Text(\"abcdefghijklmnopqrst...\")");
    }

    #[test]
    fn test_serialize_untagged() {
        let row = vec![Cell::Integer(1), Cell::text("A"), Cell::Null, Cell::Real(2.5)];
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[1,"A",null,2.5]"#);
    }

    fn any_cell() -> impl Strategy<Value = Cell> {
        prop_oneof![
            Just(Cell::Null),
            any::<bool>().prop_map(Cell::Bool),
            any::<i64>().prop_map(Cell::Integer),
            (i64::MAX - 4..=i64::MAX).prop_map(Cell::Integer),
            any::<f64>().prop_map(Cell::Real),
            Just(Cell::Real(i64::MAX as f64)),
            (-8i64..8).prop_map(|n| Cell::Real(n as f64 / 2.0)),
            "[a-c]{0,2}".prop_map(Cell::Text),
        ]
    }

    proptest! {
        #[test]
        fn prop_normalized_is_idempotent(v in any::<f64>()) {
            let once = Cell::real(v);
            let twice = once.clone().normalized();
            prop_assert_eq!(once.cell_type(), twice.cell_type());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_equality_agrees_with_total_order(a in any_cell(), b in any_cell()) {
            prop_assert_eq!(a == b, a.total_cmp(&b) == Ordering::Equal);
            prop_assert_eq!(a.total_cmp(&b), b.total_cmp(&a).reverse());
        }

        #[test]
        fn prop_whole_floats_collapse(i in -1_000_000_000i64..1_000_000_000i64) {
            let cell = Cell::from_json(&json!(i as f64));
            prop_assert!(matches!(cell, Cell::Integer(n) if n == i));
        }
    }
}
