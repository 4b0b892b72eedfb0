use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::QuestionId;

/// Selected option per question.
///
/// The store is a plain upsert map: it does not know about the exam, so bounds
/// checks on the option index belong to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerStore {
    selected: BTreeMap<QuestionId, usize>,
}

impl AnswerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `option_index` for the question, replacing any earlier choice.
    pub fn set(&mut self, question_id: QuestionId, option_index: usize) {
        self.selected.insert(question_id, option_index);
    }

    /// Returns the stored option, or `None` when unanswered.
    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<usize> {
        self.selected.get(&question_id).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.selected.contains_key(&question_id)
    }

    /// Number of distinct questions with a stored answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selected.len()
    }

    /// Iterates answers in question id order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, usize)> + '_ {
        self.selected.iter().map(|(id, index)| (*id, *index))
    }
}
