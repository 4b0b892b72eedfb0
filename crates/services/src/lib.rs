#![forbid(unsafe_code)]

pub mod error;
pub mod exams;
pub mod runner;
pub mod sessions;
pub mod ticker;

pub use exam_core::Clock;

pub use error::{ExamSourceError, RunnerConfigError, SessionError};
pub use exams::{ExamSource, InMemoryExamSource};
pub use runner::{ExamRunner, RunnerConfig, SessionHandle, spawn_session};
pub use sessions::{ExamSession, Session, SessionCommand, SessionProgress};
pub use ticker::{IntervalTicker, ManualTicker, ManualTickerHandle, Ticker};
