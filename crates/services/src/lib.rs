#![forbid(unsafe_code)]

pub mod error;
pub mod provider;
pub mod sessions;

pub use studytest_core::Clock;
pub use sessions as session;

pub use error::{ProviderError, SessionError, TimedSessionError};
pub use provider::{InMemoryTestProvider, TestProvider, decode_test};

pub use sessions::{
    AttemptRecord, CountdownTimer, NavigatorItem, OptionReview, QuestionReview, QuestionStatus,
    SessionPhase, SessionProgress, SessionService, SubmitCheck, TickOutcome, TimedSession,
};
