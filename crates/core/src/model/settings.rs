use serde::{Deserialize, Serialize};

/// How a session treats an option index outside the question's options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerPolicy {
    /// Out-of-range selections are ignored.
    #[default]
    Validate,
    /// Any index is stored; scoring counts it as wrong.
    AcceptUnvalidated,
}

/// Per-session behaviour knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    answer_policy: AnswerPolicy,
}

impl SessionSettings {
    #[must_use]
    pub fn new(answer_policy: AnswerPolicy) -> Self {
        Self { answer_policy }
    }

    #[must_use]
    pub fn answer_policy(&self) -> AnswerPolicy {
        self.answer_policy
    }

    #[must_use]
    pub fn validates_answers(&self) -> bool {
        self.answer_policy == AnswerPolicy::Validate
    }
}
