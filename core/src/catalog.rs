//! Catalog queries over assembled challenges
//!
//! Filtering and unlock progression for a course's challenge list. Both
//! operate on challenges that were already assembled; nothing here touches
//! the document store.

use std::collections::HashSet;

use log::debug;

use crate::models::{
    ChallengeDefinition, ChallengeProgress, ChallengeStatus, Difficulty, ProgressStatus,
};
use crate::utils::StringUtils;

/// Criteria a challenge must meet to be listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeFilter {
    /// Only challenges of this course
    pub course_id: Option<String>,

    /// Only challenges of this difficulty
    pub difficulty: Option<Difficulty>,

    /// Only challenges on this topic, ignoring case
    pub topic: Option<String>,

    /// Only challenges with this status
    pub status: Option<ChallengeStatus>,

    /// Case-insensitive substring of title, description or a tag
    pub search: Option<String>,
}

impl Default for ChallengeFilter {
    fn default() -> Self {
        ChallengeFilter {
            course_id: None,
            difficulty: None,
            topic: None,
            status: Some(ChallengeStatus::Active),
            search: None,
        }
    }
}

impl ChallengeFilter {
    /// Filter for the active challenges of one course
    pub fn for_course(course_id: impl Into<String>) -> Self {
        ChallengeFilter {
            course_id: Some(course_id.into()),
            ..Default::default()
        }
    }

    /// Whether a challenge meets every criterion that is set
    pub fn matches(&self, challenge: &ChallengeDefinition) -> bool {
        if let Some(course_id) = &self.course_id {
            if &challenge.course_id != course_id {
                return false;
            }
        }
        if let Some(difficulty) = self.difficulty {
            if challenge.difficulty != difficulty {
                return false;
            }
        }
        if let Some(topic) = &self.topic {
            if !challenge.topic.eq_ignore_ascii_case(topic) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if challenge.status != status {
                return false;
            }
        }
        match &self.search {
            Some(term) if !StringUtils::is_blank(term) => {
                let term = term.trim();
                StringUtils::contains_ignore_case(&challenge.title, term)
                    || StringUtils::contains_ignore_case(&challenge.description, term)
                    || challenge
                        .tags
                        .iter()
                        .any(|tag| StringUtils::contains_ignore_case(tag, term))
            }
            _ => true,
        }
    }
}

/// Challenges meeting the filter, sorted by catalog order.
///
/// The sort is stable, so challenges sharing an order keep their input
/// order.
pub fn filter_challenges<'a, I>(challenges: I, filter: &ChallengeFilter) -> Vec<ChallengeDefinition>
where
    I: IntoIterator<Item = &'a ChallengeDefinition>,
{
    let mut selected: Vec<ChallengeDefinition> = challenges
        .into_iter()
        .filter(|challenge| filter.matches(challenge))
        .cloned()
        .collect();
    selected.sort_by_key(|challenge| challenge.order);
    selected
}

/// Ids of challenges a learner has completed
pub fn completed_ids(progress: &[ChallengeProgress]) -> HashSet<String> {
    progress
        .iter()
        .filter(|p| p.status == ProgressStatus::Completed)
        .map(|p| p.challenge_id.clone())
        .collect()
}

/// Set each challenge's unlock flag from the learner's completions.
///
/// Easy challenges are always unlocked. Medium challenges unlock once every
/// easy challenge in the list is completed, and hard challenges once every
/// easy and medium challenge is.
pub fn apply_unlock_progression(
    challenges: Vec<ChallengeDefinition>,
    completed: &HashSet<String>,
) -> Vec<ChallengeDefinition> {
    let all_done = |difficulty: Difficulty| {
        challenges
            .iter()
            .filter(|c| c.difficulty == difficulty)
            .all(|c| completed.contains(&c.id))
    };
    let easy_done = all_done(Difficulty::Easy);
    let medium_done = all_done(Difficulty::Medium);
    debug!("unlock progression: easy_done={}, medium_done={}", easy_done, medium_done);

    challenges
        .into_iter()
        .map(|challenge| {
            let unlocked = match challenge.difficulty {
                Difficulty::Easy => true,
                Difficulty::Medium => easy_done,
                Difficulty::Hard => easy_done && medium_done,
            };
            challenge.with_unlocked(unlocked)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn challenge(id: &str, difficulty: Difficulty, order: i64) -> ChallengeDefinition {
        ChallengeDefinition {
            id: id.to_string(),
            title: format!("Challenge {}", id),
            description: "Practice SELECT".to_string(),
            difficulty,
            topic: "Basics".to_string(),
            course_id: "sql101".to_string(),
            order,
            ..Default::default()
        }
    }

    fn catalog() -> Vec<ChallengeDefinition> {
        let mut joins = challenge("j1", Difficulty::Medium, 2);
        joins.topic = "Joins".to_string();
        joins.tags = vec!["inner join".to_string()];

        let mut draft = challenge("d1", Difficulty::Easy, 0);
        draft.status = ChallengeStatus::Draft;

        let mut other_course = challenge("o1", Difficulty::Easy, 1);
        other_course.course_id = "sql201".to_string();

        vec![
            challenge("h1", Difficulty::Hard, 3),
            joins,
            challenge("e1", Difficulty::Easy, 1),
            draft,
            other_course,
        ]
    }

    fn ids(challenges: &[ChallengeDefinition]) -> Vec<&str> {
        challenges.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_default_filter_lists_active_by_order() {
        let listed = filter_challenges(&catalog(), &ChallengeFilter::default());
        assert_eq!(ids(&listed), vec!["e1", "o1", "j1", "h1"]);
    }

    #[test]
    fn test_course_filter() {
        let listed = filter_challenges(&catalog(), &ChallengeFilter::for_course("sql101"));
        assert_eq!(ids(&listed), vec!["e1", "j1", "h1"]);
    }

    #[rstest]
    #[case::difficulty(ChallengeFilter { difficulty: Some(Difficulty::Hard), ..Default::default() }, vec!["h1"])]
    #[case::topic_ignores_case(ChallengeFilter { topic: Some("JOINS".to_string()), ..Default::default() }, vec!["j1"])]
    #[case::search_tag(ChallengeFilter { search: Some("Inner".to_string()), ..Default::default() }, vec!["j1"])]
    #[case::search_title(ChallengeFilter { search: Some("challenge h".to_string()), ..Default::default() }, vec!["h1"])]
    #[case::blank_search(ChallengeFilter { search: Some("  ".to_string()), ..Default::default() }, vec!["e1", "o1", "j1", "h1"])]
    #[case::any_status(ChallengeFilter { status: None, ..Default::default() }, vec!["d1", "e1", "o1", "j1", "h1"])]
    fn test_filters(#[case] filter: ChallengeFilter, #[case] expected: Vec<&str>) {
        let listed = filter_challenges(&catalog(), &filter);
        assert_eq!(ids(&listed), expected);
    }

    fn unlocked(challenges: &[ChallengeDefinition]) -> Vec<(&str, bool)> {
        challenges.iter().map(|c| (c.id.as_str(), c.is_unlocked)).collect()
    }

    #[test]
    fn test_nothing_completed_unlocks_easy_only() {
        let challenges = vec![
            challenge("e1", Difficulty::Easy, 0),
            challenge("m1", Difficulty::Medium, 1),
            challenge("h1", Difficulty::Hard, 2),
        ];
        let result = apply_unlock_progression(challenges, &HashSet::new());
        assert_eq!(unlocked(&result), vec![("e1", true), ("m1", false), ("h1", false)]);
    }

    #[test]
    fn test_progression_by_tier() {
        let challenges = vec![
            challenge("e1", Difficulty::Easy, 0),
            challenge("e2", Difficulty::Easy, 1),
            challenge("m1", Difficulty::Medium, 2),
            challenge("h1", Difficulty::Hard, 3),
        ];

        let some_easy: HashSet<String> = ["e1".to_string()].into_iter().collect();
        let result = apply_unlock_progression(challenges.clone(), &some_easy);
        assert_eq!(
            unlocked(&result),
            vec![("e1", true), ("e2", true), ("m1", false), ("h1", false)]
        );

        let all_easy: HashSet<String> = ["e1", "e2"].iter().map(|s| s.to_string()).collect();
        let result = apply_unlock_progression(challenges.clone(), &all_easy);
        assert_eq!(
            unlocked(&result),
            vec![("e1", true), ("e2", true), ("m1", true), ("h1", false)]
        );

        let everything: HashSet<String> = ["e1", "e2", "m1"].iter().map(|s| s.to_string()).collect();
        let result = apply_unlock_progression(challenges, &everything);
        assert!(result.iter().all(|c| c.is_unlocked));
    }

    #[test]
    fn test_completed_ids_from_progress() {
        let now = Utc::now();
        let passed = ChallengeProgress::record_attempt(None, "e1", true, 100, "SELECT 1", 30, now);
        let failed = ChallengeProgress::record_attempt(None, "e2", false, 0, "SELECT 2", 10, now);

        let completed = completed_ids(&[passed, failed]);
        assert!(completed.contains("e1"));
        assert!(!completed.contains("e2"));
    }
}
