mod answers;
mod exam;
mod ids;
mod session;
mod settings;

pub use answers::AnswerStore;
pub use exam::{Exam, ExamDraft, ExamError, ExamQuestion, QuestionDraft};
pub use ids::{ExamId, ParseIdError, QuestionId};
pub use session::{ExamResult, QuestionOutcome, SessionStatus, SubmitTrigger};
pub use settings::{AnswerPolicy, SessionSettings};
