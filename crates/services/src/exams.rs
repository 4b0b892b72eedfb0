use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use exam_core::model::{Exam, ExamDraft, ExamId};

use crate::error::ExamSourceError;

/// Supplies exams to sessions.
#[async_trait]
pub trait ExamSource: Send + Sync {
    /// Fetch an exam by id.
    ///
    /// Returns `Ok(None)` when no such exam exists.
    ///
    /// # Errors
    ///
    /// Returns `ExamSourceError` if the source cannot be read.
    async fn find_exam(&self, id: ExamId) -> Result<Option<Exam>, ExamSourceError>;
}

/// In-memory catalog, cheap to clone and share between tasks.
#[derive(Clone, Default)]
pub struct InMemoryExamSource {
    exams: Arc<Mutex<HashMap<ExamId, Exam>>>,
}

impl InMemoryExamSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from unvalidated drafts.
    ///
    /// # Errors
    ///
    /// Returns `ExamSourceError::Malformed` for the first draft that fails validation.
    pub fn from_drafts(drafts: Vec<ExamDraft>) -> Result<Self, ExamSourceError> {
        let source = Self::new();
        for draft in drafts {
            let id = draft.id;
            let exam = draft.validate().map_err(|e| ExamSourceError::Malformed {
                id,
                reason: e.to_string(),
            })?;
            source.insert(exam)?;
        }
        Ok(source)
    }

    /// Adds or replaces an exam.
    ///
    /// # Errors
    ///
    /// Returns `ExamSourceError::Unavailable` if the catalog lock is poisoned.
    pub fn insert(&self, exam: Exam) -> Result<(), ExamSourceError> {
        let mut guard = self
            .exams
            .lock()
            .map_err(|e| ExamSourceError::Unavailable(e.to_string()))?;
        guard.insert(exam.id(), exam);
        Ok(())
    }

    /// Lists catalog entries as `(id, title)`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `ExamSourceError::Unavailable` if the catalog lock is poisoned.
    pub fn list(&self) -> Result<Vec<(ExamId, String)>, ExamSourceError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| ExamSourceError::Unavailable(e.to_string()))?;
        let mut items: Vec<_> = guard
            .values()
            .map(|exam| (exam.id(), exam.title().to_owned()))
            .collect();
        items.sort_by_key(|(id, _)| *id);
        Ok(items)
    }
}

#[async_trait]
impl ExamSource for InMemoryExamSource {
    async fn find_exam(&self, id: ExamId) -> Result<Option<Exam>, ExamSourceError> {
        let guard = self
            .exams
            .lock()
            .map_err(|e| ExamSourceError::Unavailable(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }
}
