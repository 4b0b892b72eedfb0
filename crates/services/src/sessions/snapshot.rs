use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use exam_core::model::{AnswerStore, ExamId, ExamResult, SessionStatus, SubmitTrigger};

/// Point-in-time copy of a session, suitable for rendering or persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub exam_id: ExamId,
    pub status: SessionStatus,
    pub remaining_seconds: u32,
    pub current_index: usize,
    pub answers: AnswerStore,
    pub submitted_by: Option<SubmitTrigger>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<ExamResult>,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total_questions: usize,
    pub answered: usize,
    pub current_index: usize,
    pub remaining_seconds: u32,
}

impl SessionProgress {
    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total_questions.saturating_sub(self.answered)
    }
}
