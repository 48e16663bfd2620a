//! The one-second repeating timer behind a running countdown.
//!
//! At most one interval task exists per driver. `stop()` aborts it and drops
//! its channel, so ticks queued before the stop are never delivered; a later
//! `start()` builds a fresh task whose first tick is a full period away.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable repeating tick source. Requires a tokio runtime to `start`.
#[derive(Debug)]
pub struct TickDriver {
    period: Duration,
    task: Option<JoinHandle<()>>,
    rx: Option<mpsc::Receiver<()>>,
}

impl TickDriver {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            task: None,
            rx: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.is_some()
    }

    /// Establish the interval. No-op if one is already live.
    pub fn start(&mut self) {
        if self.task.is_some() {
            return;
        }
        let (tx, rx) = mpsc::channel(1);
        let period = self.period;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        self.task = Some(task);
        self.rx = Some(rx);
        tracing::trace!(?period, "tick driver started");
    }

    /// Tear the interval down.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::trace!("tick driver stopped");
        }
        self.rx = None;
    }

    /// Match the driver to a running flag.
    pub fn sync(&mut self, running: bool) {
        if running {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Wait for the next tick. Never resolves while stopped.
    pub async fn tick(&mut self) {
        match self.rx.as_mut() {
            Some(rx) => {
                if rx.recv().await.is_none() {
                    std::future::pending::<()>().await;
                }
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
