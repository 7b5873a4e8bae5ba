use std::collections::{BTreeSet, HashMap};
use std::fmt;

use studytest_core::model::{
    OptionId, Question, QuestionId, QuestionOutcome, SubmitReason, Test, TestError, TestResult,
};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle of an attempt. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Completed,
}

/// Effect of a single countdown tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time remains; the session is still active.
    Running { remaining_secs: u32 },
    /// This tick used up the last second and submitted the attempt.
    Expired(TestResult),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one timed attempt at a test.
///
/// All mutation goes through the methods below. Once the attempt is submitted
/// (explicitly or by the countdown reaching zero) every mutating call fails
/// with `SessionError::Closed`, except `submit`, which keeps returning the
/// stored result.
///
/// The engine never reads the wall clock; time only advances through `tick`.
pub struct SessionService {
    test: Test,
    current: usize,
    answers: HashMap<QuestionId, OptionId>,
    flagged: BTreeSet<QuestionId>,
    remaining_secs: u32,
    result: Option<TestResult>,
}

impl SessionService {
    /// Start a fresh attempt at `test`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTest` if the test has no questions.
    pub fn start(test: Test) -> Result<Self, SessionError> {
        if test.is_empty() {
            return Err(SessionError::InvalidTest(TestError::NoQuestions));
        }

        log::info!(
            "starting session for test {} ({} questions, {} min)",
            test.id(),
            test.question_count(),
            test.time_limit_minutes()
        );

        Ok(Self {
            remaining_secs: test.time_limit_secs(),
            test,
            current: 0,
            answers: HashMap::new(),
            flagged: BTreeSet::new(),
            result: None,
        })
    }

    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.result.is_some() {
            SessionPhase::Completed
        } else {
            SessionPhase::Active
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // `start` rejects empty tests and `current` is always kept in range.
        &self.test.questions()[self.current]
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.test.question_count()
    }

    #[must_use]
    pub fn answer(&self, question: &QuestionId) -> Option<&OptionId> {
        self.answers.get(question)
    }

    #[must_use]
    pub fn answers(&self) -> &HashMap<QuestionId, OptionId> {
        &self.answers
    }

    #[must_use]
    pub fn is_flagged(&self, question: &QuestionId) -> bool {
        self.flagged.contains(question)
    }

    #[must_use]
    pub fn flagged(&self) -> &BTreeSet<QuestionId> {
        &self.flagged
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Seconds consumed so far.
    #[must_use]
    pub fn elapsed_secs(&self) -> u32 {
        self.test.time_limit_secs() - self.remaining_secs
    }

    #[must_use]
    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.question_count();
        let answered = self.answers.len();
        SessionProgress {
            total,
            answered,
            flagged: self.flagged.len(),
            unanswered: total - answered,
            remaining_secs: self.remaining_secs,
            is_complete: self.is_complete(),
        }
    }

    /// Record `option` as the answer to `question`, replacing any earlier pick.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` after completion, `UnknownQuestion` or
    /// `UnknownOption` when either id is not part of the test.
    pub fn select_answer(
        &mut self,
        question: &QuestionId,
        option: &OptionId,
    ) -> Result<(), SessionError> {
        self.ensure_active("select_answer")?;
        let q = self.lookup(question)?;
        if !q.has_option(option) {
            return Err(SessionError::UnknownOption {
                question: question.clone(),
                option: option.clone(),
            });
        }

        log::debug!("answer {question} -> {option}");
        self.answers.insert(question.clone(), option.clone());
        Ok(())
    }

    /// Flag `question` for review, or clear the flag if already set.
    ///
    /// Returns whether the question is flagged afterwards.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` after completion or `UnknownQuestion`.
    pub fn toggle_flag(&mut self, question: &QuestionId) -> Result<bool, SessionError> {
        self.ensure_active("toggle_flag")?;
        self.lookup(question)?;

        let flagged = if self.flagged.remove(question) {
            false
        } else {
            self.flagged.insert(question.clone());
            true
        };
        log::debug!("flag {question} = {flagged}");
        Ok(flagged)
    }

    /// Jump to the question at `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` after completion or `IndexOutOfRange`.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_active("go_to")?;
        let len = self.question_count();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        self.current = index;
        Ok(())
    }

    /// Move to the next question; stays put on the last one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` after completion.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.ensure_active("next")?;
        if self.current + 1 < self.question_count() {
            self.current += 1;
        }
        Ok(())
    }

    /// Move to the previous question; stays put on the first one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` after completion.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.ensure_active("previous")?;
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// The tick that reaches zero also submits the attempt, so remaining time
    /// is never zero while the session is still active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Closed` if the session is already complete.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.ensure_active("tick")?;
        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.remaining_secs == 0 {
            log::info!("time expired for test {}, submitting", self.test.id());
            let result = self.complete(SubmitReason::TimeExpired).clone();
            return Ok(TickOutcome::Expired(result));
        }

        Ok(TickOutcome::Running {
            remaining_secs: self.remaining_secs,
        })
    }

    /// Submit the attempt and return its result.
    ///
    /// Calling this again after completion returns the stored result without
    /// recomputing it.
    pub fn submit(&mut self) -> &TestResult {
        self.complete(SubmitReason::Manual)
    }

    fn complete(&mut self, reason: SubmitReason) -> &TestResult {
        let result = match self.result.take() {
            Some(existing) => existing,
            None => {
                let result = self.score(reason);
                log::info!(
                    "test {} submitted ({reason:?}): score {} ({}/{}) in {}s",
                    self.test.id(),
                    result.score(),
                    result.correct_count(),
                    result.total_questions(),
                    result.time_taken_secs()
                );
                result
            }
        };
        self.result.insert(result)
    }

    fn score(&self, reason: SubmitReason) -> TestResult {
        let outcomes = self
            .test
            .questions()
            .iter()
            .map(|q| {
                let selected = self.answers.get(q.id()).cloned();
                let is_correct = selected.as_ref().is_some_and(|s| q.is_correct(s));
                QuestionOutcome {
                    question_id: q.id().clone(),
                    selected,
                    correct_option: q.correct_option().clone(),
                    is_correct,
                }
            })
            .collect();

        TestResult::from_outcomes(outcomes, self.elapsed_secs(), reason)
    }

    fn ensure_active(&self, op: &str) -> Result<(), SessionError> {
        if self.is_complete() {
            log::warn!("{op} rejected: session for test {} is closed", self.test.id());
            return Err(SessionError::Closed);
        }
        Ok(())
    }

    fn lookup(&self, question: &QuestionId) -> Result<&Question, SessionError> {
        self.test
            .question(question)
            .ok_or_else(|| SessionError::UnknownQuestion {
                id: question.clone(),
            })
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("test_id", self.test.id())
            .field("questions_len", &self.question_count())
            .field("current", &self.current)
            .field("answers_len", &self.answers.len())
            .field("flagged_len", &self.flagged.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
