mod command;
mod controller;
mod snapshot;

// Public API of the session subsystem.
pub use command::SessionCommand;
pub use controller::ExamSession;
pub use snapshot::{Session, SessionProgress};
