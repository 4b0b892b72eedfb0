//! Exam session domain: the exam model, answers, navigation, countdown and scoring.
//!
//! Everything here is synchronous and side-effect free. Orchestration lives in
//! the `services` crate.

#![forbid(unsafe_code)]

pub mod countdown;
pub mod model;
pub mod navigation;
pub mod scoring;
pub mod time;

pub use countdown::{SessionClock, Tick, format_countdown};
pub use navigation::Navigator;
pub use scoring::{compute_result, question_outcomes};
pub use time::Clock;
