//! Learner query screening
//!
//! Queries are checked before anything runs against the engine. The checks
//! apply in a fixed order and the first one that fails wins.

use std::sync::OnceLock;

use regex::{Regex, RegexSet};
use thiserror::Error;

/// Longest accepted query, in characters
pub const MAX_QUERY_CHARS: usize = 1000;

/// Statements a learner query may not contain
pub const BLOCKED_KEYWORDS: [&str; 11] = [
    "DROP", "DELETE", "INSERT", "UPDATE", "CREATE", "ALTER", "EXEC", "EXECUTE", "TRUNCATE",
    "GRANT", "REVOKE",
];

/// Reason a learner query was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryRejection {
    /// Nothing but whitespace
    #[error("Query cannot be empty")]
    Empty,

    /// A blocked keyword appears as a whole word
    #[error("Keyword '{0}' is not allowed")]
    BlockedKeyword(String),

    /// Stacked statements or comments
    #[error("Query contains potentially dangerous patterns")]
    DangerousPattern,

    /// Longer than [`MAX_QUERY_CHARS`]
    #[error("Query is too long (max {max} characters)")]
    TooLong {
        /// Length of the query in characters
        length: usize,
        /// Accepted maximum
        max: usize,
    },

    /// The screening patterns failed to compile
    #[error("Query screening unavailable: {0}")]
    Unavailable(String),
}

struct Patterns {
    keywords: Regex,
    dangerous: RegexSet,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        let keywords = Regex::new(&format!(r"(?i)\b({})\b", BLOCKED_KEYWORDS.join("|")))?;
        let dangerous = RegexSet::new([
            r"(?i);\s*(DROP|DELETE|INSERT|UPDATE)",
            r"--",
            r"(?s)/\*.*\*/",
        ])?;
        Ok(Patterns { keywords, dangerous })
    }
}

fn patterns() -> Result<&'static Patterns, QueryRejection> {
    static PATTERNS: OnceLock<Result<Patterns, regex::Error>> = OnceLock::new();
    PATTERNS
        .get_or_init(Patterns::compile)
        .as_ref()
        .map_err(|e| QueryRejection::Unavailable(e.to_string()))
}

/// Screen a learner query before it reaches the engine.
///
/// Checks, in order: empty after trimming, blocked keywords (whole words,
/// any case), stacked destructive statements or comments, and length.
pub fn validate_query(query: &str) -> Result<(), QueryRejection> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(QueryRejection::Empty);
    }

    let patterns = patterns()?;
    if let Some(found) = patterns.keywords.find(trimmed) {
        return Err(QueryRejection::BlockedKeyword(found.as_str().to_uppercase()));
    }
    if patterns.dangerous.is_match(trimmed) {
        return Err(QueryRejection::DangerousPattern);
    }

    let length = trimmed.chars().count();
    if length > MAX_QUERY_CHARS {
        return Err(QueryRejection::TooLong {
            length,
            max: MAX_QUERY_CHARS,
        });
    }

    Ok(())
}
