//! Ingestion of raw challenge documents
//!
//! This module turns loosely typed documents, as delivered by the document
//! store, into [`ChallengeDefinition`](crate::models::ChallengeDefinition)
//! values. Problems confined to one field are reported as [`Diagnostic`]s
//! next to the assembled challenge instead of failing the whole document.

mod row;
mod assembler;

pub use row::{fit_row, normalize_cells, normalize_row, RowEncoding, RowError, RowFit};
pub use assembler::{assemble, Assembled, AssemblyError, ChallengeAssembler};

use std::fmt::{Display, Formatter, Result as FmtResult};
use log::warn;

use crate::models::TableError;

/// A raw challenge document
pub type Document = serde_json::Map<String, serde_json::Value>;

/// What went wrong in one field of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Row dropped from its table
    RowDropped(RowError),

    /// Short row filled with nulls
    RowPadded {
        /// Cells added
        missing: usize,
    },

    /// Long row cut to the declared columns
    RowTruncated {
        /// Cells removed
        extra: usize,
    },

    /// Table field could not be read; an empty table was used instead
    MalformedTable(String),

    /// Table failed structural validation; an empty table was used instead
    InvalidTable(TableError),

    /// Field holds a value of the wrong kind; the default was used instead
    WrongType {
        /// Kind the field should hold
        expected: &'static str,
        /// Kind found
        found: &'static str,
    },

    /// Enumerated field holds an unknown value; the default was used instead
    UnknownValue {
        /// Value found
        found: String,
        /// Default used
        default: &'static str,
    },

    /// Entry skipped inside a list field
    EntrySkipped(String),
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DiagnosticKind::RowDropped(err) => write!(f, "row dropped: {}", err),
            DiagnosticKind::RowPadded { missing } => {
                write!(f, "row padded with {} NULL cell(s)", missing)
            }
            DiagnosticKind::RowTruncated { extra } => {
                write!(f, "row truncated by {} cell(s)", extra)
            }
            DiagnosticKind::MalformedTable(reason) => {
                write!(f, "malformed table, using an empty table: {}", reason)
            }
            DiagnosticKind::InvalidTable(err) => {
                write!(f, "invalid table, using an empty table: {}", err)
            }
            DiagnosticKind::WrongType { expected, found } => {
                write!(f, "expected {}, found {}; using the default", expected, found)
            }
            DiagnosticKind::UnknownValue { found, default } => {
                write!(f, "unknown value '{}'; using '{}'", found, default)
            }
            DiagnosticKind::EntrySkipped(reason) => write!(f, "entry skipped: {}", reason),
        }
    }
}

/// A problem found while assembling one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Path of the offending field, e.g. `sample_table.rows[2]`
    pub location: String,

    /// What went wrong
    pub kind: DiagnosticKind,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

/// Collects diagnostics and logs each one as it arrives
#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub(crate) fn report(&mut self, location: impl Into<String>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic {
            location: location.into(),
            kind,
        };
        warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub(crate) fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// Name of a JSON value's kind, for diagnostics
pub(crate) fn kind_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
