mod input;
mod phase;
mod progress;
mod service;
mod study;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use input::{SessionCommand, SessionKey};
pub use phase::{SessionEvent, SessionPhase};
pub use progress::SessionProgress;
pub use service::QuizSession;
pub use study::StudyList;
pub use view::SessionView;
pub use workflow::{QuizLoopService, QuizRun, SessionStep};
