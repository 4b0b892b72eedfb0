use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{ExamId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExamError {
    #[error("exam title cannot be empty")]
    EmptyTitle,

    #[error("exam duration must be > 0 seconds")]
    InvalidDuration,

    #[error("question {id} has empty text")]
    EmptyQuestionText { id: QuestionId },

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} marks option {index} correct but only has {len} options")]
    CorrectOptionOutOfRange {
        id: QuestionId,
        index: usize,
        len: usize,
    },

    #[error("question id {0} appears more than once")]
    DuplicateQuestionId(QuestionId),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamQuestion {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_option_index: usize,
    marks: u32,
}

impl ExamQuestion {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptyQuestionText` if the text is blank,
    /// `ExamError::NoOptions` if there are no options, and
    /// `ExamError::CorrectOptionOutOfRange` if the correct index does not name an option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_option_index: usize,
        marks: u32,
    ) -> Result<Self, ExamError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ExamError::EmptyQuestionText { id });
        }
        if options.is_empty() {
            return Err(ExamError::NoOptions { id });
        }
        if correct_option_index >= options.len() {
            return Err(ExamError::CorrectOptionOutOfRange {
                id,
                index: correct_option_index,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_option_index,
            marks,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_option_index(&self) -> usize {
        self.correct_option_index
    }

    #[must_use]
    pub fn marks(&self) -> u32 {
        self.marks
    }

    /// Returns true if `index` names one of this question's options.
    #[must_use]
    pub fn has_option(&self, index: usize) -> bool {
        index < self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_option_index
    }
}

//
// ─── EXAM ──────────────────────────────────────────────────────────────────────
//

/// A timed assessment with an ordered, fixed list of questions.
///
/// An exam may be constructed with zero questions; a session refuses to start
/// on it and reports the exam as unavailable instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exam {
    id: ExamId,
    title: String,
    duration_seconds: u32,
    total_marks: u32,
    questions: Vec<ExamQuestion>,
}

impl Exam {
    /// Creates a validated exam.
    ///
    /// # Errors
    ///
    /// Returns `ExamError::EmptyTitle` for a blank title, `ExamError::InvalidDuration`
    /// for a zero duration, and `ExamError::DuplicateQuestionId` if two questions share an id.
    pub fn new(
        id: ExamId,
        title: impl Into<String>,
        duration_seconds: u32,
        total_marks: u32,
        questions: Vec<ExamQuestion>,
    ) -> Result<Self, ExamError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ExamError::EmptyTitle);
        }
        if duration_seconds == 0 {
            return Err(ExamError::InvalidDuration);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(ExamError::DuplicateQuestionId(question.id()));
            }
        }

        Ok(Self {
            id,
            title,
            duration_seconds,
            total_marks,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> ExamId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    #[must_use]
    pub fn total_marks(&self) -> u32 {
        self.total_marks
    }

    #[must_use]
    pub fn questions(&self) -> &[ExamQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn has_questions(&self) -> bool {
        !self.questions.is_empty()
    }

    /// Returns the question at the given position, if any.
    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<&ExamQuestion> {
        self.questions.get(index)
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&ExamQuestion> {
        self.questions.iter().find(|q| q.id() == id)
    }
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as supplied by an exam data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    #[serde(default)]
    pub marks: u32,
}

/// Unvalidated exam as supplied by an exam data provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamDraft {
    pub id: ExamId,
    pub title: String,
    pub duration_seconds: u32,
    pub total_marks: u32,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

impl QuestionDraft {
    /// Validate into an `ExamQuestion`.
    ///
    /// # Errors
    ///
    /// See [`ExamQuestion::new`].
    pub fn validate(self) -> Result<ExamQuestion, ExamError> {
        ExamQuestion::new(
            self.id,
            self.text,
            self.options,
            self.correct_option_index,
            self.marks,
        )
    }
}

impl ExamDraft {
    /// Validate into an `Exam`, checking every question.
    ///
    /// # Errors
    ///
    /// Returns the first `ExamError` found.
    pub fn validate(self) -> Result<Exam, ExamError> {
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDraft::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Exam::new(
            self.id,
            self.title,
            self.duration_seconds,
            self.total_marks,
            questions,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    fn question(id: u64) -> ExamQuestion {
        ExamQuestion::new(QuestionId::new(id), "What?", options(4), 1, 5).unwrap()
    }

    #[test]
    fn question_rejects_out_of_range_correct_index() {
        let err = ExamQuestion::new(QuestionId::new(1), "Q", options(2), 2, 1).unwrap_err();
        assert_eq!(
            err,
            ExamError::CorrectOptionOutOfRange {
                id: QuestionId::new(1),
                index: 2,
                len: 2,
            }
        );
    }

    #[test]
    fn question_requires_options_and_text() {
        let err = ExamQuestion::new(QuestionId::new(1), "Q", Vec::new(), 0, 1).unwrap_err();
        assert!(matches!(err, ExamError::NoOptions { .. }));

        let err = ExamQuestion::new(QuestionId::new(1), "  ", options(2), 0, 1).unwrap_err();
        assert!(matches!(err, ExamError::EmptyQuestionText { .. }));
    }

    #[test]
    fn exam_rejects_duplicate_question_ids() {
        let err = Exam::new(ExamId::new(1), "Algebra", 60, 10, vec![question(1), question(1)])
            .unwrap_err();
        assert_eq!(err, ExamError::DuplicateQuestionId(QuestionId::new(1)));
    }

    #[test]
    fn exam_rejects_zero_duration() {
        let err = Exam::new(ExamId::new(1), "Algebra", 0, 10, vec![question(1)]).unwrap_err();
        assert_eq!(err, ExamError::InvalidDuration);
    }

    #[test]
    fn exam_without_questions_is_constructible() {
        let exam = Exam::new(ExamId::new(1), "Empty", 60, 0, Vec::new()).unwrap();
        assert!(!exam.has_questions());
        assert_eq!(exam.question_at(0), None);
    }

    #[test]
    fn lookup_by_id_and_position() {
        let exam = Exam::new(ExamId::new(1), "Algebra", 60, 10, vec![question(3), question(9)])
            .unwrap();
        assert_eq!(exam.question_at(1).map(ExamQuestion::id), Some(QuestionId::new(9)));
        assert_eq!(exam.question(QuestionId::new(3)).map(|q| q.marks()), Some(5));
        assert!(exam.question(QuestionId::new(4)).is_none());
    }

    #[test]
    fn draft_deserializes_and_validates() {
        let json = r#"{
            "id": 7,
            "title": "Physics mock",
            "duration_seconds": 600,
            "total_marks": 10,
            "questions": [
                { "id": 1, "text": "g?", "options": ["9.8", "8.9"], "correct_option_index": 0, "marks": 5 },
                { "id": 2, "text": "c?", "options": ["3e8", "3e6"], "correct_option_index": 0 }
            ]
        }"#;
        let draft: ExamDraft = serde_json::from_str(json).unwrap();
        let exam = draft.validate().unwrap();
        assert_eq!(exam.id(), ExamId::new(7));
        assert_eq!(exam.question_count(), 2);
        assert_eq!(exam.questions()[1].marks(), 0);
    }

    #[test]
    fn draft_surfaces_question_errors() {
        let draft = ExamDraft {
            id: ExamId::new(1),
            title: "Broken".into(),
            duration_seconds: 60,
            total_marks: 5,
            questions: vec![QuestionDraft {
                id: QuestionId::new(1),
                text: "Q".into(),
                options: vec!["a".into()],
                correct_option_index: 3,
                marks: 5,
            }],
        };
        assert!(matches!(
            draft.validate(),
            Err(ExamError::CorrectOptionOutOfRange { index: 3, .. })
        ));
    }
}
