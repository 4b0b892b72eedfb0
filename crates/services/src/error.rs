//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::ExamId;

/// Errors emitted by an `ExamSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExamSourceError {
    #[error("exam source unavailable: {0}")]
    Unavailable(String),
    #[error("exam {id} is malformed: {reason}")]
    Malformed { id: ExamId, reason: String },
}

/// Errors emitted when talking to a running session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session is no longer accepting commands")]
    Finished,
}

/// Errors emitted while building a `RunnerConfig`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunnerConfigError {
    #[error("tick period must be > 0")]
    ZeroTickPeriod,
    #[error("command buffer must hold at least one command")]
    ZeroCommandBuffer,
}
