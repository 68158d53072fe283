//! Data models for SQL challenges
//!
//! This module provides data structures for representing normalized cells,
//! tables, assembled challenges and learner progress.

mod cell;
mod table;
mod challenge;
mod progress;

pub use cell::{Cell, CellType, NormalizedRow};
pub use table::{TableSpec, TableError};
pub use challenge::{ChallengeDefinition, ChallengeStatus, Difficulty, TestCase};
pub use progress::{ChallengeProgress, ChallengeStats, ProgressStatus};
