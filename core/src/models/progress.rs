//! Learner progress records and aggregate statistics

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

/// Progress state of one learner on one challenge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    /// No attempt yet
    #[default]
    NotStarted,

    /// Attempted, not yet passed
    InProgress,

    /// Passed at least once
    Completed,
}

/// Progress of one learner on one challenge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProgress {
    /// Challenge this record belongs to
    pub challenge_id: String,

    /// Current state
    pub status: ProgressStatus,

    /// Number of attempts so far
    pub attempts: u32,

    /// Best score over all attempts
    pub best_score: u32,

    /// Time of the latest attempt
    pub last_attempt: Option<DateTime<Utc>>,

    /// Time spent on the latest attempt, in seconds
    pub time_taken_secs: u64,

    /// Query submitted in the latest attempt
    pub user_query: String,

    /// Whether the latest attempt passed
    pub passed: bool,
}

impl ChallengeProgress {
    /// Fold one attempt into the previous record, if any.
    pub fn record_attempt(
        previous: Option<&ChallengeProgress>,
        challenge_id: &str,
        passed: bool,
        score: u32,
        user_query: &str,
        time_taken_secs: u64,
        at: DateTime<Utc>,
    ) -> Self {
        ChallengeProgress {
            challenge_id: challenge_id.to_string(),
            status: if passed {
                ProgressStatus::Completed
            } else {
                ProgressStatus::InProgress
            },
            attempts: previous.map_or(0, |p| p.attempts) + 1,
            best_score: score.max(previous.map_or(0, |p| p.best_score)),
            last_attempt: Some(at),
            time_taken_secs,
            user_query: user_query.to_string(),
            passed,
        }
    }

    /// Human readable status
    pub fn status_text(&self) -> &'static str {
        match self.status {
            ProgressStatus::NotStarted => "Not Started",
            ProgressStatus::InProgress => "In Progress",
            ProgressStatus::Completed => "Completed",
        }
    }

    /// Time taken as `N/A`, `42s` or `3m 5s`
    pub fn formatted_time_taken(&self) -> String {
        if self.time_taken_secs == 0 {
            return "N/A".to_string();
        }
        let minutes = self.time_taken_secs / 60;
        let seconds = self.time_taken_secs % 60;
        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Aggregate statistics over a learner's progress records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStats {
    /// Challenges available
    pub total_challenges: usize,

    /// Challenges with a completed record
    pub completed_challenges: usize,

    /// Attempts across all records
    pub total_attempts: u64,

    /// Mean best score across records
    pub average_score: f64,

    /// Seconds spent across records
    pub total_time_taken: u64,
}

impl ChallengeStats {
    /// Aggregate progress records against the number of available challenges
    pub fn from_progress(total_challenges: usize, progress: &[ChallengeProgress]) -> Self {
        let average_score = if progress.is_empty() {
            0.0
        } else {
            progress.iter().map(|p| p.best_score as f64).sum::<f64>() / progress.len() as f64
        };

        ChallengeStats {
            total_challenges,
            completed_challenges: progress
                .iter()
                .filter(|p| p.status == ProgressStatus::Completed)
                .count(),
            total_attempts: progress.iter().map(|p| p.attempts as u64).sum(),
            average_score,
            total_time_taken: progress.iter().map(|p| p.time_taken_secs).sum(),
        }
    }

    /// Completed share of all challenges, rounded down
    pub fn completion_percentage(&self) -> u32 {
        if self.total_challenges == 0 {
            return 0;
        }
        ((self.completed_challenges as f64 / self.total_challenges as f64) * 100.0) as u32
    }

    /// Average score with one decimal, e.g. `87.5%`
    pub fn formatted_average_score(&self) -> String {
        format!("{:.1}%", self.average_score)
    }
}
