use studytest_core::model::{OptionId, QuestionId};

use super::service::SessionService;

//
// ─── NAVIGATOR ─────────────────────────────────────────────────────────────────
//

/// Display status of a question in the navigator grid.
///
/// When several apply, the first listed wins: the current question is shown
/// as current even if answered, and an answered question hides its flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Flagged,
    Unanswered,
}

/// One cell of the question navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorItem {
    pub index: usize,
    pub question_id: QuestionId,
    pub status: QuestionStatus,
    pub flagged: bool,
}

//
// ─── REVIEW ────────────────────────────────────────────────────────────────────
//

/// An option as shown on the results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionReview {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
    pub is_selected: bool,
}

/// Per-question review line shown after completion.
///
/// This is intentionally **not** a UI view-model: no pre-formatted strings
/// beyond the content texts themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub index: usize,
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: Vec<OptionReview>,
    pub is_correct: bool,
    /// Text of the correct option, present only when the question was missed.
    pub correction: Option<String>,
}

//
// ─── SUBMIT CHECK ──────────────────────────────────────────────────────────────
//

/// Caller-side confirmation policy for manual submission.
///
/// The engine never blocks `submit`; front ends use this to decide whether to
/// ask the user first. Timeouts submit without asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitCheck {
    pub unanswered: usize,
    pub threshold: usize,
}

impl SubmitCheck {
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        self.unanswered > self.threshold
    }

    /// Warning text to show before submitting, if confirmation is needed.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        if !self.needs_confirmation() {
            return None;
        }
        let plural = if self.unanswered > 1 { "s" } else { "" };
        Some(format!(
            "You have {} unanswered question{plural}. Are you sure you want to submit?",
            self.unanswered
        ))
    }
}

//
// ─── SESSION READ MODELS ───────────────────────────────────────────────────────
//

impl SessionService {
    /// Status of every question, in test order.
    #[must_use]
    pub fn navigator(&self) -> Vec<NavigatorItem> {
        self.test()
            .questions()
            .iter()
            .enumerate()
            .map(|(index, q)| {
                let flagged = self.is_flagged(q.id());
                let status = if index == self.current_index() {
                    QuestionStatus::Current
                } else if self.answer(q.id()).is_some() {
                    QuestionStatus::Answered
                } else if flagged {
                    QuestionStatus::Flagged
                } else {
                    QuestionStatus::Unanswered
                };
                NavigatorItem {
                    index,
                    question_id: q.id().clone(),
                    status,
                    flagged,
                }
            })
            .collect()
    }

    /// Review of every question, or `None` while the attempt is still active.
    #[must_use]
    pub fn review(&self) -> Option<Vec<QuestionReview>> {
        let result = self.result()?;
        let review = self
            .test()
            .questions()
            .iter()
            .zip(result.outcomes())
            .enumerate()
            .map(|(index, (q, outcome))| QuestionReview {
                index,
                question_id: q.id().clone(),
                prompt: q.prompt().to_string(),
                options: q
                    .options()
                    .iter()
                    .map(|o| OptionReview {
                        id: o.id.clone(),
                        text: o.text.clone(),
                        is_correct: q.is_correct(&o.id),
                        is_selected: outcome.selected.as_ref() == Some(&o.id),
                    })
                    .collect(),
                is_correct: outcome.is_correct,
                correction: (!outcome.is_correct).then(|| q.correct_text().to_string()),
            })
            .collect();
        Some(review)
    }

    /// Confirmation check for a manual submit with the given tolerance.
    #[must_use]
    pub fn submit_check(&self, unanswered_threshold: usize) -> SubmitCheck {
        SubmitCheck {
            unanswered: self.progress().unanswered,
            threshold: unanswered_threshold,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
