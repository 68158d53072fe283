//! SQL challenge representation
//!
//! This module provides the assembled, validated form of one challenge
//! document.

use std::fmt::{Display, Formatter, Result as FmtResult};
use serde::Serialize;

use crate::compare::ComparisonVerdict;
use crate::utils::StringUtils;
use super::table::TableSpec;

/// Difficulty of a challenge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    /// Always unlocked
    #[default]
    Easy,

    /// Unlocked once every easy challenge is completed
    Medium,

    /// Unlocked once every easy and medium challenge is completed
    Hard,
}

impl Difficulty {
    /// Parse a difficulty name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Canonical name as stored in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Publication status of a challenge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    /// Visible to learners
    #[default]
    Active,

    /// Being authored
    Draft,

    /// Retired
    Archived,
}

impl ChallengeStatus {
    /// Parse a status name, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(ChallengeStatus::Active),
            "draft" => Some(ChallengeStatus::Draft),
            "archived" => Some(ChallengeStatus::Archived),
            _ => None,
        }
    }

    /// Canonical name as stored in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Active => "active",
            ChallengeStatus::Draft => "draft",
            ChallengeStatus::Archived => "archived",
        }
    }
}

impl Display for ChallengeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Extra validation metadata attached to a challenge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Identifier within the challenge
    pub id: i64,

    /// What the case checks
    pub description: String,

    /// Row count the learner's result must have
    pub expected_row_count: usize,

    /// Column count the learner's result must have
    pub expected_column_count: usize,
}

impl TestCase {
    /// Check the actual result shape reported by a verdict
    pub fn check(&self, verdict: &ComparisonVerdict) -> bool {
        verdict.actual_row_count == self.expected_row_count
            && verdict.actual_column_count == self.expected_column_count
    }
}

/// One assembled SQL challenge
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDefinition {
    /// Document identifier
    pub id: String,

    /// Title; never blank
    pub title: String,

    /// Problem statement
    pub description: String,

    /// Difficulty level
    pub difficulty: Difficulty,

    /// Topic, e.g. "Joins"
    pub topic: String,

    /// Owning course
    pub course_id: String,

    /// Reference solution
    pub expected_query: String,

    /// Result the learner's query must produce
    pub expected_result: TableSpec,

    /// Primary table materialized before the learner's query runs
    pub sample_table: TableSpec,

    /// Further tables materialized after the sample table
    pub additional_tables: Vec<TableSpec>,

    /// Hints, in display order
    pub hints: Vec<String>,

    /// Tags, without duplicates
    pub tags: Vec<String>,

    /// Publication status
    pub status: ChallengeStatus,

    /// Position in the catalog
    pub order: i64,

    /// Author name
    pub author: String,

    /// Creation timestamp as stored
    pub created_at: String,

    /// Last update timestamp as stored
    pub updated_at: String,

    /// Extra result-shape checks
    pub test_cases: Vec<TestCase>,

    /// Computed for the current learner; never persisted
    #[serde(skip)]
    pub is_unlocked: bool,
}

impl Default for ChallengeDefinition {
    fn default() -> Self {
        ChallengeDefinition {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            difficulty: Difficulty::default(),
            topic: String::new(),
            course_id: String::new(),
            expected_query: String::new(),
            expected_result: TableSpec::default(),
            sample_table: TableSpec::default(),
            additional_tables: Vec::new(),
            hints: Vec::new(),
            tags: Vec::new(),
            status: ChallengeStatus::default(),
            order: 0,
            author: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            test_cases: Vec::new(),
            is_unlocked: true,
        }
    }
}

impl ChallengeDefinition {
    /// Whether the challenge carries enough content to be played.
    ///
    /// This is a curation check, not a parse result: a challenge that fails
    /// it was still ingested.
    pub fn is_usable(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.description.trim().is_empty()
            && !self.expected_result.columns.is_empty()
            && !self.sample_table.name.trim().is_empty()
            && !self.sample_table.columns.is_empty()
    }

    /// All tables to materialize, sample table first
    pub fn all_tables(&self) -> Vec<&TableSpec> {
        std::iter::once(&self.sample_table)
            .chain(self.additional_tables.iter())
            .collect()
    }

    /// Description cut to `max_chars` characters
    pub fn description_preview(&self, max_chars: usize) -> String {
        StringUtils::truncate(&self.description, max_chars)
    }

    /// Tags joined for display
    pub fn tags_string(&self) -> String {
        self.tags.join(", ")
    }

    /// Copy with the computed unlock flag set
    pub fn with_unlocked(mut self, unlocked: bool) -> Self {
        self.is_unlocked = unlocked;
        self
    }
}
