use exam_core::model::QuestionId;

/// Host input for a running session.
///
/// A host with several input handlers funnels them all into one queue of these,
/// so the session sees a single ordered stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    SelectAnswer {
        question_id: QuestionId,
        option_index: usize,
    },
    /// Answer the question the session is on when the command is applied,
    /// not the one the host last saw.
    SelectCurrent {
        option_index: usize,
    },
    GoTo(usize),
    Next,
    Previous,
    Submit,
}
