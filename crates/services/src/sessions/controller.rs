use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, info, warn};

use exam_core::model::{
    AnswerStore, Exam, ExamId, ExamQuestion, ExamResult, QuestionId, QuestionOutcome,
    SessionSettings, SessionStatus, SubmitTrigger,
};
use exam_core::{Clock, Navigator, SessionClock, Tick, compute_result, question_outcomes};

use super::command::SessionCommand;
use super::snapshot::{Session, SessionProgress};
use crate::exams::ExamSource;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at one exam.
///
/// Owns the countdown, the answers and the navigation cursor, and moves
/// through `Loading → InProgress → Submitting → Completed` (or
/// `Loading → NotFound`). Every mutating call outside `InProgress` is a no-op
/// that returns `false` or `None`.
pub struct ExamSession {
    exam_id: ExamId,
    exam: Option<Exam>,
    settings: SessionSettings,
    wall_clock: Clock,
    clock: SessionClock,
    answers: AnswerStore,
    navigator: Navigator,
    status: SessionStatus,
    submitting: bool,
    submitted_by: Option<SubmitTrigger>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    result: Option<ExamResult>,
}

impl ExamSession {
    /// Create a session waiting for its exam to be resolved.
    #[must_use]
    pub fn loading(exam_id: ExamId) -> Self {
        Self {
            exam_id,
            exam: None,
            settings: SessionSettings::default(),
            wall_clock: Clock::default(),
            clock: SessionClock::new(),
            answers: AnswerStore::new(),
            navigator: Navigator::new(0),
            status: SessionStatus::Loading,
            submitting: false,
            submitted_by: None,
            started_at: None,
            completed_at: None,
            result: None,
        }
    }

    /// Create a session and start it on `exam` straight away.
    #[must_use]
    pub fn start(exam: Exam) -> Self {
        Self::start_with(exam, SessionSettings::default(), Clock::default())
    }

    /// Like [`ExamSession::start`], with explicit settings and timestamp clock.
    #[must_use]
    pub fn start_with(exam: Exam, settings: SessionSettings, clock: Clock) -> Self {
        let mut session = Self::loading(exam.id())
            .with_settings(settings)
            .with_clock(clock);
        session.resolve(Some(exam));
        session
    }

    /// Look the exam up in `source` and resolve the session with it.
    ///
    /// Source failures are logged and end in `NotFound`, like a missing exam.
    pub async fn open(
        source: &dyn ExamSource,
        exam_id: ExamId,
        settings: SessionSettings,
        clock: Clock,
    ) -> Self {
        let mut session = Self::loading(exam_id)
            .with_settings(settings)
            .with_clock(clock);
        let exam = match source.find_exam(exam_id).await {
            Ok(exam) => exam,
            Err(err) => {
                warn!(%exam_id, error = %err, "exam lookup failed");
                None
            }
        };
        session.resolve(exam);
        session
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.wall_clock = clock;
        self
    }

    /// Leave `Loading` with the resolved exam.
    ///
    /// A missing exam, an exam without questions, or an exam whose id does
    /// not match the session ends in `NotFound`. Has no effect outside `Loading`.
    pub fn resolve(&mut self, exam: Option<Exam>) -> SessionStatus {
        if self.status != SessionStatus::Loading {
            debug!(exam_id = %self.exam_id, status = ?self.status, "resolve ignored");
            return self.status;
        }

        let exam = match exam {
            Some(exam) if exam.id() != self.exam_id => {
                warn!(exam_id = %self.exam_id, resolved = %exam.id(), "resolved exam id mismatch");
                None
            }
            Some(exam) if !exam.has_questions() => None,
            other => other,
        };

        let Some(exam) = exam else {
            info!(exam_id = %self.exam_id, "exam unavailable");
            self.status = SessionStatus::NotFound;
            return self.status;
        };

        self.navigator = Navigator::new(exam.question_count());
        self.answers = AnswerStore::new();
        self.clock.start(exam.duration_seconds());
        self.started_at = Some(self.wall_clock.now());
        self.status = SessionStatus::InProgress;
        info!(
            exam_id = %self.exam_id,
            questions = exam.question_count(),
            duration_seconds = exam.duration_seconds(),
            "exam session started"
        );
        self.exam = Some(exam);
        self.status
    }

    //
    // ─── ACCESSORS ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn exam_id(&self) -> ExamId {
        self.exam_id
    }

    #[must_use]
    pub fn exam(&self) -> Option<&Exam> {
        self.exam.as_ref()
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.navigator.current()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&ExamQuestion> {
        self.exam.as_ref()?.question_at(self.navigator.current())
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    #[must_use]
    pub fn result(&self) -> Option<&ExamResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn submitted_by(&self) -> Option<SubmitTrigger> {
        self.submitted_by
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Per-question review, available once the attempt is scored.
    #[must_use]
    pub fn question_outcomes(&self) -> Option<Vec<QuestionOutcome>> {
        if !self.is_complete() {
            return None;
        }
        self.exam
            .as_ref()
            .map(|exam| question_outcomes(exam, &self.answers))
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total_questions: self.navigator.question_count(),
            answered: self.answers.answered_count(),
            current_index: self.navigator.current(),
            remaining_seconds: self.clock.remaining(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        Session {
            exam_id: self.exam_id,
            status: self.status,
            remaining_seconds: self.clock.remaining(),
            current_index: self.navigator.current(),
            answers: self.answers.clone(),
            submitted_by: self.submitted_by,
            started_at: self.started_at,
            completed_at: self.completed_at,
            result: self.result,
        }
    }

    //
    // ─── COMMANDS ──────────────────────────────────────────────────────────────
    //

    /// Record an answer for a question of this exam.
    ///
    /// Unknown question ids are ignored. Under `AnswerPolicy::Validate` an
    /// option index past the question's options is ignored as well.
    pub fn select_answer(&mut self, question_id: QuestionId, option_index: usize) -> bool {
        if !self.is_in_progress() {
            debug!(%question_id, status = ?self.status, "answer ignored outside exam");
            return false;
        }
        let Some(question) = self.exam.as_ref().and_then(|e| e.question(question_id)) else {
            debug!(%question_id, "answer for unknown question ignored");
            return false;
        };
        if self.settings.validates_answers() && !question.has_option(option_index) {
            debug!(%question_id, option_index, "answer option out of range ignored");
            return false;
        }

        self.answers.set(question_id, option_index);
        true
    }

    /// Record an answer for whichever question the cursor is on when this
    /// runs.
    pub fn select_current(&mut self, option_index: usize) -> bool {
        let Some(question_id) = self.current_question().map(ExamQuestion::id) else {
            return false;
        };
        self.select_answer(question_id, option_index)
    }

    /// Jump to the question at `index`. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if !self.is_in_progress() {
            return false;
        }
        let moved = self.navigator.jump(index);
        if !moved {
            debug!(index, "navigation out of range ignored");
        }
        moved
    }

    /// Move to the next question; no-op on the last one.
    pub fn next(&mut self) -> bool {
        self.is_in_progress() && self.navigator.advance()
    }

    /// Move to the previous question; no-op on the first one.
    pub fn previous(&mut self) -> bool {
        self.is_in_progress() && self.navigator.retreat()
    }

    /// Submit the attempt and return its result.
    ///
    /// Calling again after completion changes nothing and returns the same result.
    pub fn request_submit(&mut self) -> Option<&ExamResult> {
        if self.is_in_progress() {
            self.submit(SubmitTrigger::Manual);
        }
        self.result.as_ref()
    }

    /// Count down one second; the tick that reaches zero submits the attempt.
    pub fn on_tick(&mut self) -> Option<Tick> {
        if !self.is_in_progress() {
            return None;
        }
        let tick = self.clock.tick()?;
        if tick.expired {
            self.submit(SubmitTrigger::Expired);
        }
        Some(tick)
    }

    /// Apply a host command. Returns true if it changed the session.
    pub fn apply(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::SelectAnswer {
                question_id,
                option_index,
            } => self.select_answer(question_id, option_index),
            SessionCommand::SelectCurrent { option_index } => self.select_current(option_index),
            SessionCommand::GoTo(index) => self.go_to(index),
            SessionCommand::Next => self.next(),
            SessionCommand::Previous => self.previous(),
            SessionCommand::Submit => {
                let was_in_progress = self.is_in_progress();
                self.request_submit();
                was_in_progress
            }
        }
    }

    fn submit(&mut self, trigger: SubmitTrigger) {
        if self.submitting {
            debug!(exam_id = %self.exam_id, ?trigger, "duplicate submission ignored");
            return;
        }
        self.submitting = true;
        self.status = SessionStatus::Submitting;
        self.clock.stop();

        let remaining = self.clock.remaining();
        let Some(exam) = self.exam.as_ref() else {
            return;
        };
        let result = compute_result(exam, &self.answers, remaining);

        self.result = Some(result);
        self.submitted_by = Some(trigger);
        self.completed_at = Some(self.wall_clock.now());
        self.status = SessionStatus::Completed;
        info!(
            exam_id = %self.exam_id,
            ?trigger,
            score = result.score,
            total_marks = result.total_marks,
            time_taken_seconds = result.time_taken_seconds,
            "exam submitted"
        );
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("exam_id", &self.exam_id)
            .field("status", &self.status)
            .field("remaining_seconds", &self.clock.remaining())
            .field("current_index", &self.navigator.current())
            .field("answered", &self.answers.answered_count())
            .field("submitted_by", &self.submitted_by)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use exam_core::model::AnswerPolicy;
    use exam_core::time::fixed_now;

    fn build_exam(question_count: u64, total_marks: u32, duration_seconds: u32) -> Exam {
        let questions = (1..=question_count)
            .map(|id| {
                ExamQuestion::new(
                    QuestionId::new(id),
                    format!("Question {id}"),
                    vec!["A".into(), "B".into(), "C".into(), "D".into()],
                    0,
                    total_marks / u32::try_from(question_count.max(1)).unwrap(),
                )
                .unwrap()
            })
            .collect();
        Exam::new(ExamId::new(1), "Mock test", duration_seconds, total_marks, questions).unwrap()
    }

    fn tick_n(session: &mut ExamSession, n: u32) {
        for _ in 0..n {
            session.on_tick();
        }
    }

    #[test]
    fn start_initializes_session() {
        let session = ExamSession::start(build_exam(3, 30, 600));
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.remaining_seconds(), 600);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answers().answered_count(), 0);
        assert_eq!(session.current_question().map(ExamQuestion::id), Some(QuestionId::new(1)));
    }

    #[test]
    fn manual_submit_scores_half_correct_attempt() {
        let mut session = ExamSession::start(build_exam(2, 10, 600));
        assert!(session.select_answer(QuestionId::new(1), 0));
        assert!(session.select_answer(QuestionId::new(2), 3));
        tick_n(&mut session, 60);
        assert_eq!(session.remaining_seconds(), 540);

        let result = *session.request_submit().unwrap();
        assert_eq!(result.score, 5);
        assert_eq!(result.percentage, 50);
        assert_eq!(result.time_taken_seconds, 60);
        assert_eq!(result.answered_count, 2);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.submitted_by(), Some(SubmitTrigger::Manual));
    }

    #[test]
    fn expiry_auto_submits_unanswered_attempt() {
        let mut session = ExamSession::start(build_exam(1, 10, 60));
        tick_n(&mut session, 59);
        assert!(session.is_in_progress());

        let last = session.on_tick().unwrap();
        assert!(last.expired);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.submitted_by(), Some(SubmitTrigger::Expired));

        let result = session.result().unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.percentage, 0);
        assert_eq!(result.time_taken_seconds, 60);
        assert_eq!(result.answered_count, 0);
    }

    #[test]
    fn exam_without_questions_is_not_found() {
        let mut session = ExamSession::start(build_exam(0, 10, 60));
        assert_eq!(session.status(), SessionStatus::NotFound);
        assert!(session.request_submit().is_none());
        assert!(session.on_tick().is_none());
        assert_eq!(session.status(), SessionStatus::NotFound);
    }

    #[test]
    fn missing_exam_is_not_found() {
        let mut session = ExamSession::loading(ExamId::new(4));
        assert_eq!(session.resolve(None), SessionStatus::NotFound);
        assert_eq!(session.resolve(Some(build_exam(1, 1, 60))), SessionStatus::NotFound);
    }

    #[test]
    fn mismatched_exam_id_is_not_found() {
        let mut session = ExamSession::loading(ExamId::new(99));
        assert_eq!(session.resolve(Some(build_exam(1, 1, 60))), SessionStatus::NotFound);
    }

    #[test]
    fn second_submit_returns_same_result() {
        let mut session = ExamSession::start(build_exam(2, 10, 600));
        session.select_answer(QuestionId::new(1), 0);
        let first = *session.request_submit().unwrap();
        tick_n(&mut session, 5);
        let second = *session.request_submit().unwrap();

        assert_eq!(first, second);
        assert_eq!(session.remaining_seconds(), 600);
        assert_eq!(session.submitted_by(), Some(SubmitTrigger::Manual));
    }

    #[test]
    fn submit_after_expiry_changes_nothing() {
        let mut session = ExamSession::start(build_exam(1, 10, 3));
        tick_n(&mut session, 3);
        let expired = *session.result().unwrap();

        let again = *session.request_submit().unwrap();
        assert_eq!(expired, again);
        assert_eq!(session.submitted_by(), Some(SubmitTrigger::Expired));
    }

    #[test]
    fn completed_session_rejects_mutation() {
        let mut session = ExamSession::start(build_exam(3, 30, 600));
        session.select_answer(QuestionId::new(1), 0);
        session.request_submit();
        let before = session.snapshot();

        assert!(!session.select_answer(QuestionId::new(2), 0));
        assert!(!session.go_to(2));
        assert!(!session.next());
        assert!(!session.previous());
        assert!(session.on_tick().is_none());
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn navigation_is_bounded() {
        let mut session = ExamSession::start(build_exam(3, 30, 600));
        assert!(!session.go_to(3));
        assert_eq!(session.current_index(), 0);
        assert!(!session.previous());
        assert!(session.go_to(2));
        assert!(!session.next());
        assert_eq!(session.current_index(), 2);
        assert!(session.previous());
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn unknown_question_answer_is_ignored() {
        let mut session = ExamSession::start(build_exam(2, 10, 600));
        assert!(!session.select_answer(QuestionId::new(42), 0));
        assert_eq!(session.answers().answered_count(), 0);
    }

    #[test]
    fn out_of_range_option_is_ignored_by_default() {
        let mut session = ExamSession::start(build_exam(1, 10, 600));
        session.select_answer(QuestionId::new(1), 1);
        assert!(!session.select_answer(QuestionId::new(1), 4));
        assert_eq!(session.answers().get(QuestionId::new(1)), Some(1));
    }

    #[test]
    fn unvalidated_policy_stores_any_option() {
        let settings = SessionSettings::new(AnswerPolicy::AcceptUnvalidated);
        let mut session =
            ExamSession::start_with(build_exam(1, 10, 600), settings, Clock::default());
        assert!(session.select_answer(QuestionId::new(1), 4));

        let result = session.request_submit().unwrap();
        assert_eq!(result.answered_count, 1);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn timestamps_come_from_injected_clock() {
        let mut session = ExamSession::loading(ExamId::new(1))
            .with_clock(Clock::fixed(fixed_now()));
        session.resolve(Some(build_exam(1, 10, 60)));
        assert_eq!(session.started_at(), Some(fixed_now()));

        session.request_submit();
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert!(session.completed_at().unwrap() - session.started_at().unwrap() < Duration::seconds(1));
    }

    #[test]
    fn outcomes_only_after_completion() {
        let mut session = ExamSession::start(build_exam(2, 10, 600));
        session.select_answer(QuestionId::new(2), 0);
        assert!(session.question_outcomes().is_none());

        session.request_submit();
        let outcomes = session.question_outcomes().unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(!outcomes[0].is_correct);
        assert!(outcomes[1].is_correct);
    }

    #[test]
    fn apply_routes_commands() {
        let mut session = ExamSession::start(build_exam(2, 10, 600));
        assert!(session.apply(SessionCommand::Next));
        assert!(session.apply(SessionCommand::SelectAnswer {
            question_id: QuestionId::new(2),
            option_index: 0,
        }));
        assert!(!session.apply(SessionCommand::GoTo(7)));
        assert!(session.apply(SessionCommand::Submit));
        assert!(!session.apply(SessionCommand::Submit));
        assert_eq!(session.result().unwrap().score, 5);
    }

    #[test]
    fn select_current_follows_the_cursor() {
        let mut session = ExamSession::start(build_exam(3, 30, 90));
        assert!(session.apply(SessionCommand::Next));
        assert!(session.apply(SessionCommand::SelectCurrent { option_index: 2 }));
        assert!(!session.apply(SessionCommand::SelectCurrent { option_index: 9 }));

        assert_eq!(session.answers().get(QuestionId::new(1)), None);
        assert_eq!(session.answers().get(QuestionId::new(2)), Some(2));

        session.request_submit();
        assert!(!session.select_current(0));
        assert_eq!(session.answers().answered_count(), 1);
    }

    #[test]
    fn progress_reflects_state() {
        let mut session = ExamSession::start(build_exam(3, 30, 90));
        session.select_answer(QuestionId::new(3), 2);
        session.go_to(1);
        tick_n(&mut session, 10);

        let progress = session.progress();
        assert_eq!(progress.total_questions, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.unanswered(), 2);
        assert_eq!(progress.current_index, 1);
        assert_eq!(progress.remaining_seconds, 80);
    }

    #[test]
    fn snapshot_serializes_for_persistence() {
        let mut session = ExamSession::start_with(
            build_exam(1, 10, 60),
            SessionSettings::default(),
            Clock::fixed(fixed_now()),
        );
        session.select_answer(QuestionId::new(1), 0);
        session.request_submit();

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["submitted_by"], "manual");
        assert_eq!(json["answers"]["1"], 0);
        assert_eq!(json["result"]["score"], 10);

        let back: Session = serde_json::from_value(json).unwrap();
        assert_eq!(back, session.snapshot());
    }
}
