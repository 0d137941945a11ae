use crate::session::SessionIntent;

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, trace};

/// Owned, cancellable countdown tick source.
///
/// Sends [`SessionIntent::Tick`] tagged with its epoch once per period until
/// cancelled, dropped, or the receiving side closes. The first tick lands
/// one full period after start.
#[derive(Debug)]
pub struct CountdownTimer {
    epoch: u64,
    task: JoinHandle<()>,
}

impl CountdownTimer {
    /// Spawn the tick task on the current tokio runtime.
    pub fn start(period: Duration, epoch: u64, tick_tx: mpsc::Sender<SessionIntent>) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // interval() completes its first tick immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                trace!(epoch, "Countdown tick");
                if tick_tx.send(SessionIntent::Tick { epoch }).await.is_err() {
                    debug!(epoch, "Intent channel closed, countdown timer exiting");
                    break;
                }
            }
        });

        debug!(epoch, period_ms = period.as_millis(), "Countdown timer started");

        Self { epoch, task }
    }

    /// Epoch the ticks are tagged with.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether the tick task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop producing ticks.
    pub fn cancel(self) {
        debug!(epoch = self.epoch, "Countdown timer cancelled");
        // Drop aborts the task.
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
