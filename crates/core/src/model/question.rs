use serde::{Deserialize, Serialize};

use crate::model::ids::{OptionId, QuestionId};
use crate::model::test::TestError;

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One selectable answer of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(id),
            text: text.into(),
        }
    }
}

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Unvalidated question as supplied by a test provider.
///
/// Field aliases accept the camelCase shape the web client used
/// (`text`, `correctAnswer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    #[serde(alias = "text")]
    pub prompt: String,
    pub options: Vec<AnswerOption>,
    #[serde(alias = "correctAnswer", alias = "correct_answer")]
    pub correct_option: OptionId,
}

impl QuestionDraft {
    /// Convenience constructor taking `(option_id, text)` pairs.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: &[(&str, &str)],
        correct_option: impl Into<String>,
    ) -> Self {
        Self {
            id: QuestionId::new(id),
            prompt: prompt.into(),
            options: options
                .iter()
                .map(|(id, text)| AnswerOption::new(*id, *text))
                .collect(),
            correct_option: OptionId::new(correct_option),
        }
    }

    pub(crate) fn validate(self) -> Result<Question, TestError> {
        if self.prompt.trim().is_empty() {
            return Err(TestError::EmptyPrompt { question: self.id });
        }
        if self.options.is_empty() {
            return Err(TestError::NoOptions { question: self.id });
        }
        for (idx, option) in self.options.iter().enumerate() {
            if self.options[..idx].iter().any(|prev| prev.id == option.id) {
                return Err(TestError::DuplicateOption {
                    question: self.id.clone(),
                    option: option.id.clone(),
                });
            }
        }
        if !self.options.iter().any(|o| o.id == self.correct_option) {
            return Err(TestError::UnknownCorrectOption {
                question: self.id,
                option: self.correct_option,
            });
        }

        Ok(Question {
            id: self.id,
            prompt: self.prompt,
            options: self.options,
            correct_option: self.correct_option,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Validated multiple-choice question.
///
/// Option ids are unique and the correct option is one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<AnswerOption>,
    correct_option: OptionId,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &OptionId {
        &self.correct_option
    }

    #[must_use]
    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    #[must_use]
    pub fn has_option(&self, id: &OptionId) -> bool {
        self.option(id).is_some()
    }

    #[must_use]
    pub fn is_correct(&self, selected: &OptionId) -> bool {
        &self.correct_option == selected
    }

    /// Display text of the correct option.
    #[must_use]
    pub fn correct_text(&self) -> &str {
        self.option(&self.correct_option)
            .map_or("", |o| o.text.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> [(&'static str, &'static str); 3] {
        [("a", "Newton"), ("b", "Joule"), ("c", "Watt")]
    }

    #[test]
    fn valid_question_exposes_options() {
        let q = QuestionDraft::new("q1", "Unit of force?", &abc(), "a")
            .validate()
            .unwrap();

        assert_eq!(q.id(), &QuestionId::new("q1"));
        assert_eq!(q.options().len(), 3);
        assert!(q.has_option(&OptionId::new("c")));
        assert!(!q.has_option(&OptionId::new("d")));
        assert!(q.is_correct(&OptionId::new("a")));
        assert_eq!(q.correct_text(), "Newton");
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let err = QuestionDraft::new("q1", "  ", &abc(), "a")
            .validate()
            .unwrap_err();
        assert!(matches!(err, TestError::EmptyPrompt { .. }));
    }

    #[test]
    fn question_without_options_is_rejected() {
        let err = QuestionDraft::new("q1", "Prompt", &[], "a")
            .validate()
            .unwrap_err();
        assert!(matches!(err, TestError::NoOptions { .. }));
    }

    #[test]
    fn duplicate_option_ids_are_rejected() {
        let err = QuestionDraft::new("q1", "Prompt", &[("a", "x"), ("a", "y")], "a")
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            TestError::DuplicateOption {
                question: QuestionId::new("q1"),
                option: OptionId::new("a"),
            }
        );
    }

    #[test]
    fn correct_option_must_exist() {
        let err = QuestionDraft::new("q1", "Prompt", &abc(), "z")
            .validate()
            .unwrap_err();
        assert!(matches!(err, TestError::UnknownCorrectOption { .. }));
    }

    #[test]
    fn draft_accepts_web_client_field_names() {
        let json = r#"{
            "id": "q2",
            "text": "Which is a vector?",
            "options": [{"id": "a", "text": "Mass"}, {"id": "c", "text": "Velocity"}],
            "correctAnswer": "c"
        }"#;
        let draft: QuestionDraft = serde_json::from_str(json).unwrap();
        let q = draft.validate().unwrap();
        assert_eq!(q.prompt(), "Which is a vector?");
        assert_eq!(q.correct_option(), &OptionId::new("c"));
    }
}
