//! String utility functions
//!
//! This module provides the string handling shared by the SQL generator,
//! the catalog search and the display helpers.

/// String utility functions
#[derive(Debug)]
pub struct StringUtils;

impl StringUtils {
    /// Truncate a string to a maximum number of characters with ellipsis
    pub fn truncate(s: &str, max_chars: usize) -> String {
        match s.char_indices().nth(max_chars) {
            None => s.to_string(),
            Some((byte_idx, _)) => {
                let mut result = s[..byte_idx].to_string();
                result.push_str("...");
                result
            }
        }
    }

    /// Quote a SQL string literal, doubling embedded single quotes
    pub fn quote_literal(s: &str) -> String {
        let mut quoted = String::with_capacity(s.len() + 2);
        quoted.push('\'');
        for c in s.chars() {
            if c == '\'' {
                quoted.push('\'');
            }
            quoted.push(c);
        }
        quoted.push('\'');
        quoted
    }

    /// Case-insensitive substring search
    pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }

    /// Whether a string is empty or only whitespace
    pub fn is_blank(s: &str) -> bool {
        s.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_truncate() {
        assert_eq!(StringUtils::truncate("Hello", 10), "Hello");
        assert_eq!(StringUtils::truncate("Hello", 5), "Hello");
        assert_eq!(StringUtils::truncate("Hello, world!", 5), "Hello...");
        assert_eq!(StringUtils::truncate("", 5), "");
        assert_eq!(StringUtils::truncate("añoñaño", 3), "año...");
    }

    #[test]
    fn test_quote_literal() {
        assert_eq!(StringUtils::quote_literal("Maria"), "'Maria'");
        assert_eq!(StringUtils::quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(StringUtils::quote_literal("''"), "''''''");
        assert_eq!(StringUtils::quote_literal(""), "''");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(StringUtils::contains_ignore_case("Inner JOIN basics", "join"));
        assert!(StringUtils::contains_ignore_case("anything", ""));
        assert!(!StringUtils::contains_ignore_case("GROUP BY", "having"));
    }

    #[test]
    fn test_is_blank() {
        assert!(StringUtils::is_blank(""));
        assert!(StringUtils::is_blank(" \t\n"));
        assert!(!StringUtils::is_blank(" x "));
    }

    proptest! {
        #[test]
        fn prop_quote_literal_unquotes(s in ".{0,24}") {
            let quoted = StringUtils::quote_literal(&s);
            prop_assert!(quoted.starts_with('\'') && quoted.ends_with('\''));

            let inner = &quoted[1..quoted.len() - 1];
            prop_assert!(!inner.replace("''", "").contains('\''));
            prop_assert_eq!(inner.replace("''", "'"), s);
        }
    }
}
