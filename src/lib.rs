/// SQL Challenge - normalization, materialization and scoring of SQL exercises
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `sql-challenge-core`: challenge documents, row normalization, SQL generation and scoring
/// - `sql-challenge-cli`: command line runner backed by an embedded SQLite engine

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
