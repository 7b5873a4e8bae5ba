mod progress;
mod service;
mod timer;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{SessionPhase, SessionService, TickOutcome};
pub use timer::{CountdownTimer, TICK_PERIOD};
pub use view::{NavigatorItem, OptionReview, QuestionReview, QuestionStatus, SubmitCheck};
pub use workflow::{AttemptRecord, TimedSession};
