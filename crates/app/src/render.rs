use serde::Serialize;
use std::fmt::Write as _;

use exam_core::format_countdown;
use exam_core::model::{Exam, ExamId, ExamResult, QuestionOutcome, SubmitTrigger};
use services::Session;

use crate::input::option_label;

/// Renders the question the session is currently on.
#[must_use]
pub fn question_view(exam: &Exam, session: &Session) -> String {
    let mut out = String::new();
    let total = exam.question_count();
    let _ = writeln!(
        out,
        "[{}] Question {} of {} ({} answered)",
        format_countdown(session.remaining_seconds),
        session.current_index + 1,
        total,
        session.answers.answered_count(),
    );

    let Some(question) = exam.question_at(session.current_index) else {
        return out;
    };
    let selected = session.answers.get(question.id());
    let _ = writeln!(out, "{}", question.text());
    for (i, option) in question.options().iter().enumerate() {
        let marker = if selected == Some(i) { '*' } else { ' ' };
        let _ = writeln!(out, " {marker} {}) {option}", option_label(i));
    }
    out
}

/// Final report printed as JSON on stdout.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub exam_id: ExamId,
    pub title: &'a str,
    pub submitted_by: Option<SubmitTrigger>,
    pub result: Option<ExamResult>,
    pub questions: Vec<QuestionOutcome>,
}
