use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Period of the production countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cooperative, cancellable periodic trigger for a session countdown.
///
/// Ticks are delivered over an `mpsc` channel to the single owner of the
/// session. Cancelling (or dropping) the timer aborts the background task, and
/// the receiver then yields `None`, so no tick arrives after teardown.
///
/// Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct CountdownTimer {
    task: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    /// Spawn a timer that fires every `period`, first after one full period.
    #[must_use]
    pub fn start(period: Duration) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        log::debug!("countdown timer started ({period:?})");
        (Self { task: Some(task) }, rx)
    }

    /// Stop delivering ticks. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("countdown timer cancelled");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
