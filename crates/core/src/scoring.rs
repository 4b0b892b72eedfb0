//! Scoring for a submitted attempt.

use crate::model::{AnswerStore, Exam, ExamResult, QuestionOutcome};

/// Scores an attempt.
///
/// The score is the exam's `total_marks` scaled by the fraction of questions
/// answered correctly, with halves rounded up. Pure and deterministic.
#[must_use]
pub fn compute_result(
    exam: &Exam,
    answers: &AnswerStore,
    remaining_seconds_at_submission: u32,
) -> ExamResult {
    let total_questions = exam.question_count();
    let total_marks = exam.total_marks();

    let correct_count = exam
        .questions()
        .iter()
        .filter(|q| answers.get(q.id()).is_some_and(|i| q.is_correct(i)))
        .count();

    let score = if total_questions == 0 {
        0
    } else {
        round_ratio(correct_count as u64 * u64::from(total_marks), total_questions as u64)
    };

    let percentage = if total_marks == 0 {
        0
    } else {
        round_ratio(u64::from(score) * 100, u64::from(total_marks))
    };

    ExamResult {
        score,
        total_marks,
        percentage,
        time_taken_seconds: exam
            .duration_seconds()
            .saturating_sub(remaining_seconds_at_submission),
        answered_count: answers.answered_count(),
        total_questions,
    }
}

/// Lists every question with the candidate's choice and whether it was right.
#[must_use]
pub fn question_outcomes(exam: &Exam, answers: &AnswerStore) -> Vec<QuestionOutcome> {
    exam.questions()
        .iter()
        .map(|q| {
            let selected = answers.get(q.id());
            QuestionOutcome {
                question_id: q.id(),
                selected,
                correct_option_index: q.correct_option_index(),
                is_correct: selected.is_some_and(|i| q.is_correct(i)),
            }
        })
        .collect()
}

/// `round(numerator / denominator)` with halves rounded up, in integers.
fn round_ratio(numerator: u64, denominator: u64) -> u32 {
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
