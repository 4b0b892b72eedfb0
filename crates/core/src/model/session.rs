use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an exam attempt.
///
/// Transitions only move forward:
/// `Loading → InProgress → Submitting → Completed`, or `Loading → NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Loading,
    InProgress,
    Submitting,
    Completed,
    NotFound,
}

impl SessionStatus {
    /// Returns true once no further transition is possible.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::NotFound)
    }
}

/// What caused the attempt to be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitTrigger {
    /// The candidate asked to submit.
    Manual,
    /// The countdown reached zero.
    Expired,
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Scored outcome of a completed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamResult {
    pub score: u32,
    pub total_marks: u32,
    pub percentage: u32,
    pub time_taken_seconds: u32,
    pub answered_count: usize,
    pub total_questions: usize,
}

impl ExamResult {
    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total_questions.saturating_sub(self.answered_count)
    }
}

/// Per-question review line for a results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub selected: Option<usize>,
    pub correct_option_index: usize,
    pub is_correct: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_not_found_are_terminal() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::NotFound.is_terminal());
        assert!(!SessionStatus::Loading.is_terminal());
        assert!(!SessionStatus::InProgress.is_terminal());
        assert!(!SessionStatus::Submitting.is_terminal());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SessionStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn unanswered_count_saturates() {
        let result = ExamResult {
            score: 0,
            total_marks: 10,
            percentage: 0,
            time_taken_seconds: 5,
            answered_count: 1,
            total_questions: 3,
        };
        assert_eq!(result.unanswered_count(), 2);
    }
}
