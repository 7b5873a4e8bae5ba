//! Shared error types for the services crate.

use thiserror::Error;

use studytest_core::model::{OptionId, QuestionId, TestError, TestId};

/// Errors emitted by the session engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid test: {0}")]
    InvalidTest(#[from] TestError),
    #[error("unknown question {id}")]
    UnknownQuestion { id: QuestionId },
    #[error("question {question} has no option {option}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
    #[error("question index {index} out of range (test has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("session already completed")]
    Closed,
}

/// Errors emitted by `TestProvider` implementations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("test {0} not found")]
    NotFound(TestId),
    #[error("invalid test: {0}")]
    InvalidTest(#[from] TestError),
    #[error("could not decode test: {0}")]
    Decode(String),
    #[error("test provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted while starting or driving a `TimedSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimedSessionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
