use chrono::{DateTime, Utc};

/// Seconds in one minute of a test's time limit.
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Remaining time below which the countdown is shown as a warning.
pub const LOW_TIME_THRESHOLD_SECS: u32 = 300;

/// Wall-clock source for attempt timestamps.
///
/// The session engine never reads this; only the orchestration layer stamps
/// `started_at` / `completed_at` with it.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }
}

/// Formats a second count as `MM:SS`.
///
/// Minutes are zero padded to two digits but never truncated, so a three hour
/// limit renders as `180:00`.
#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    let minutes = seconds / SECONDS_PER_MINUTE;
    let remainder = seconds % SECONDS_PER_MINUTE;
    format!("{minutes:02}:{remainder:02}")
}

/// True when the countdown should be rendered as a warning.
#[must_use]
pub fn is_low_time(remaining_secs: u32) -> bool {
    remaining_secs < LOW_TIME_THRESHOLD_SECS
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
