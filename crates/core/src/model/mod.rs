mod ids;
mod question;
mod result;
mod test;

pub use ids::{AttemptId, OptionId, QuestionId, TestId};

pub use question::{AnswerOption, Question, QuestionDraft};
pub use result::{QuestionOutcome, ScoreBand, SubmitReason, TestResult, score_percent};
pub use test::{MAX_TIME_LIMIT_MINUTES, Test, TestDraft, TestError};
