use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId, TestId};
use crate::model::question::{Question, QuestionDraft};
use crate::time::SECONDS_PER_MINUTE;

/// Upper bound on a test's time limit (one day).
pub const MAX_TIME_LIMIT_MINUTES: u32 = 24 * 60;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Structural problems with a test.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TestError {
    #[error("test title cannot be empty")]
    EmptyTitle,

    #[error("time limit must be between 1 and 1440 minutes, got {minutes}")]
    InvalidTimeLimit { minutes: u32 },

    #[error("test has no questions")]
    NoQuestions,

    #[error("duplicate question id {id}")]
    DuplicateQuestion { id: QuestionId },

    #[error("question {question} has an empty prompt")]
    EmptyPrompt { question: QuestionId },

    #[error("question {question} has no options")]
    NoOptions { question: QuestionId },

    #[error("question {question} repeats option id {option}")]
    DuplicateOption {
        question: QuestionId,
        option: OptionId,
    },

    #[error("question {question} names correct option {option}, which it does not offer")]
    UnknownCorrectOption {
        question: QuestionId,
        option: OptionId,
    },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated test as delivered by a test provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDraft {
    pub id: TestId,
    pub title: String,
    #[serde(alias = "timeLimit")]
    pub time_limit_minutes: u32,
    pub questions: Vec<QuestionDraft>,
}

impl TestDraft {
    /// Validate the draft's structure.
    ///
    /// An empty question list passes here; starting a session on such a test is
    /// what fails.
    ///
    /// # Errors
    ///
    /// Returns the first `TestError` found, checking the title, the time limit,
    /// then each question in order.
    pub fn validate(self) -> Result<Test, TestError> {
        if self.title.trim().is_empty() {
            return Err(TestError::EmptyTitle);
        }
        if self.time_limit_minutes == 0 || self.time_limit_minutes > MAX_TIME_LIMIT_MINUTES {
            return Err(TestError::InvalidTimeLimit {
                minutes: self.time_limit_minutes,
            });
        }

        let mut questions: Vec<Question> = Vec::with_capacity(self.questions.len());
        for draft in self.questions {
            if questions.iter().any(|q| q.id() == &draft.id) {
                return Err(TestError::DuplicateQuestion { id: draft.id });
            }
            questions.push(draft.validate()?);
        }

        Ok(Test {
            id: self.id,
            title: self.title,
            time_limit_minutes: self.time_limit_minutes,
            questions,
        })
    }
}

//
// ─── TEST ──────────────────────────────────────────────────────────────────────
//

/// A validated test: ordered questions plus a time limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Test {
    id: TestId,
    title: String,
    time_limit_minutes: u32,
    questions: Vec<Question>,
}

impl Test {
    #[must_use]
    pub fn id(&self) -> &TestId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }

    /// Time limit in whole seconds.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_minutes * SECONDS_PER_MINUTE
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Returns a copy of this test with a different time limit.
    ///
    /// # Errors
    ///
    /// Returns `TestError::InvalidTimeLimit` for zero or over-long limits.
    pub fn with_time_limit(mut self, minutes: u32) -> Result<Self, TestError> {
        if minutes == 0 || minutes > MAX_TIME_LIMIT_MINUTES {
            return Err(TestError::InvalidTimeLimit { minutes });
        }
        self.time_limit_minutes = minutes;
        Ok(self)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(questions: Vec<QuestionDraft>) -> TestDraft {
        TestDraft {
            id: TestId::new("t1"),
            title: "Physics".to_string(),
            time_limit_minutes: 45,
            questions,
        }
    }

    fn q(id: &str) -> QuestionDraft {
        QuestionDraft::new(id, "Prompt", &[("a", "A"), ("b", "B")], "a")
    }

    #[test]
    fn valid_draft_builds_test() {
        let test = draft(vec![q("q1"), q("q2")]).validate().unwrap();

        assert_eq!(test.title(), "Physics");
        assert_eq!(test.question_count(), 2);
        assert_eq!(test.time_limit_secs(), 45 * 60);
        assert_eq!(test.questions()[1].id(), &QuestionId::new("q2"));
        assert!(test.question(&QuestionId::new("q3")).is_none());
    }

    #[test]
    fn empty_question_list_passes_structural_checks() {
        let test = draft(Vec::new()).validate().unwrap();
        assert!(test.is_empty());
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut d = draft(vec![q("q1")]);
        d.title = " ".to_string();
        assert_eq!(d.validate().unwrap_err(), TestError::EmptyTitle);
    }

    #[test]
    fn time_limit_bounds_are_enforced() {
        let mut d = draft(vec![q("q1")]);
        d.time_limit_minutes = 0;
        assert_eq!(
            d.clone().validate().unwrap_err(),
            TestError::InvalidTimeLimit { minutes: 0 }
        );

        d.time_limit_minutes = MAX_TIME_LIMIT_MINUTES + 1;
        assert!(matches!(
            d.validate().unwrap_err(),
            TestError::InvalidTimeLimit { .. }
        ));
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let err = draft(vec![q("q1"), q("q1")]).validate().unwrap_err();
        assert_eq!(
            err,
            TestError::DuplicateQuestion {
                id: QuestionId::new("q1")
            }
        );
    }

    #[test]
    fn question_errors_propagate() {
        let bad = QuestionDraft::new("q2", "Prompt", &[("a", "A")], "b");
        let err = draft(vec![q("q1"), bad]).validate().unwrap_err();
        assert!(matches!(err, TestError::UnknownCorrectOption { .. }));
    }

    #[test]
    fn time_limit_override() {
        let test = draft(vec![q("q1")]).validate().unwrap();
        let test = test.with_time_limit(1).unwrap();
        assert_eq!(test.time_limit_secs(), 60);
        assert!(test.with_time_limit(0).is_err());
    }

    #[test]
    fn draft_decodes_web_client_shape() {
        let json = r#"{
            "id": "1",
            "title": "Physics Chapter 1-3 Test",
            "timeLimit": 45,
            "questions": [{
                "id": "q1",
                "text": "What is the SI unit of force?",
                "options": [{"id": "a", "text": "Newton"}, {"id": "b", "text": "Joule"}],
                "correctAnswer": "a"
            }]
        }"#;
        let test = serde_json::from_str::<TestDraft>(json)
            .unwrap()
            .validate()
            .unwrap();
        assert_eq!(test.time_limit_minutes(), 45);
        assert_eq!(test.questions()[0].correct_text(), "Newton");
    }
}
