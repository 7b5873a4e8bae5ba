use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;

use studytest_core::model::{AttemptId, OptionId, QuestionId, Test, TestId, TestResult};

use super::service::{SessionService, TickOutcome};
use super::timer::CountdownTimer;
use crate::Clock;
use crate::error::{SessionError, TimedSessionError};
use crate::provider::TestProvider;

/// Summary of a finished attempt, handed to whoever wants to keep it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRecord {
    pub attempt_id: AttemptId,
    pub test_id: TestId,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub result: TestResult,
}

/// A session engine wired to a running countdown.
///
/// Owns the `SessionService` and its `CountdownTimer`. Every mutation goes
/// through this type so completion, by either path, stops the timer before the
/// caller sees the completed state.
#[derive(Debug)]
pub struct TimedSession {
    attempt_id: AttemptId,
    clock: Clock,
    session: SessionService,
    timer: CountdownTimer,
    ticks: mpsc::Receiver<()>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TimedSession {
    /// Load `test_id` from `provider` and start a timed attempt.
    ///
    /// # Errors
    ///
    /// Returns `TimedSessionError::Provider` if loading fails and
    /// `TimedSessionError::Session` if the test cannot be started.
    pub async fn start(
        provider: &dyn TestProvider,
        test_id: &TestId,
        clock: Clock,
        period: Duration,
    ) -> Result<Self, TimedSessionError> {
        let test = provider.load_test(test_id).await?;
        Ok(Self::from_test(test, clock, period)?)
    }

    /// Start a timed attempt on an already loaded test.
    ///
    /// Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTest` for a test without questions.
    pub fn from_test(test: Test, clock: Clock, period: Duration) -> Result<Self, SessionError> {
        let session = SessionService::start(test)?;
        let (timer, ticks) = CountdownTimer::start(period);
        let attempt_id = AttemptId::generate();
        log::info!("attempt {attempt_id} started");
        Ok(Self {
            attempt_id,
            clock,
            session,
            timer,
            ticks,
            started_at: clock.now(),
            completed_at: None,
        })
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Read access for rendering.
    #[must_use]
    pub fn session(&self) -> &SessionService {
        &self.session
    }

    #[must_use]
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Wait for the next timer tick and apply it.
    ///
    /// Returns `None` once the session is complete or the timer was cancelled.
    /// Cancel-safe: usable as a `tokio::select!` branch.
    pub async fn next_tick(&mut self) -> Option<TickOutcome> {
        if self.session.is_complete() {
            self.finish_if_complete();
            return None;
        }
        self.ticks.recv().await?;
        let outcome = self.session.tick().ok()?;
        self.finish_if_complete();
        Some(outcome)
    }

    /// # Errors
    ///
    /// See `SessionService::select_answer`.
    pub fn select_answer(
        &mut self,
        question: &QuestionId,
        option: &OptionId,
    ) -> Result<(), SessionError> {
        self.session.select_answer(question, option)
    }

    /// # Errors
    ///
    /// See `SessionService::toggle_flag`.
    pub fn toggle_flag(&mut self, question: &QuestionId) -> Result<bool, SessionError> {
        self.session.toggle_flag(question)
    }

    /// # Errors
    ///
    /// See `SessionService::go_to`.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.session.go_to(index)
    }

    /// # Errors
    ///
    /// See `SessionService::next`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(), SessionError> {
        self.session.next()
    }

    /// # Errors
    ///
    /// See `SessionService::previous`.
    pub fn previous(&mut self) -> Result<(), SessionError> {
        self.session.previous()
    }

    /// Submit the attempt and stop the countdown.
    pub fn submit(&mut self) -> TestResult {
        let result = self.session.submit().clone();
        self.finish_if_complete();
        result
    }

    /// Tear down the countdown without submitting.
    ///
    /// The session stays active but no further ticks will be applied.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        // A tick may already sit in the channel; drop it with the rest.
        self.ticks.close();
        while self.ticks.try_recv().is_ok() {}
    }

    /// Snapshot of the finished attempt, or `None` while still active.
    #[must_use]
    pub fn record(&self) -> Option<AttemptRecord> {
        let result = self.session.result()?.clone();
        Some(AttemptRecord {
            attempt_id: self.attempt_id,
            test_id: self.session.test().id().clone(),
            started_at: self.started_at,
            completed_at: self.completed_at.unwrap_or(self.started_at),
            result,
        })
    }

    fn finish_if_complete(&mut self) {
        if self.session.is_complete() && self.completed_at.is_none() {
            self.timer.cancel();
            self.completed_at = Some(self.clock.now());
            log::info!("attempt {} completed", self.attempt_id);
        }
    }
}
