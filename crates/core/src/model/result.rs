use serde::{Deserialize, Serialize};

use crate::model::ids::{OptionId, QuestionId};

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

/// Percentage of correct answers, rounded half up to a whole number.
///
/// Returns 0 for an empty test.
#[must_use]
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    // round(100 * c / t) == floor((200 * c + t) / (2 * t)) for non-negative values
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded).unwrap_or(100)
}

/// Coarse grading of a score, as used for the results bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    /// 70 and above.
    Strong,
    /// 50 to 69.
    Fair,
    /// Below 50.
    Weak,
}

impl ScoreBand {
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => Self::Strong,
            50..=69 => Self::Fair,
            _ => Self::Weak,
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// What closed the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitReason {
    Manual,
    TimeExpired,
}

/// Per-question line of a scored attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub selected: Option<OptionId>,
    pub correct_option: OptionId,
    pub is_correct: bool,
}

/// Scored outcome of a completed attempt. Fixed once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    score: u8,
    correct_count: usize,
    answered_count: usize,
    time_taken_secs: u32,
    reason: SubmitReason,
    outcomes: Vec<QuestionOutcome>,
}

impl TestResult {
    /// Build a result from per-question outcomes in test order.
    #[must_use]
    pub fn from_outcomes(
        outcomes: Vec<QuestionOutcome>,
        time_taken_secs: u32,
        reason: SubmitReason,
    ) -> Self {
        let correct_count = outcomes.iter().filter(|o| o.is_correct).count();
        let answered_count = outcomes.iter().filter(|o| o.selected.is_some()).count();
        Self {
            score: score_percent(correct_count, outcomes.len()),
            correct_count,
            answered_count,
            time_taken_secs,
            reason,
            outcomes,
        }
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.score
    }

    #[must_use]
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct_count
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answered_count
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u32 {
        self.time_taken_secs
    }

    #[must_use]
    pub fn reason(&self) -> SubmitReason {
        self.reason
    }

    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn outcome(&self, id: &QuestionId) -> Option<&QuestionOutcome> {
        self.outcomes.iter().find(|o| &o.question_id == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
