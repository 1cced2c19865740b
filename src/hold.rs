//! Press-and-hold repeat timer.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldState {
    Idle,
    Holding,
}

/// Runs a tick callback immediately on press and then every `period` until release
pub struct HoldController {
    period: Duration,
    timer: Option<JoinHandle<()>>,
}

impl HoldController {
    pub fn new(period: Duration) -> Self {
        Self { period, timer: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> HoldState {
        if self.timer.is_some() {
            HoldState::Holding
        } else {
            HoldState::Idle
        }
    }

    pub fn is_holding(&self) -> bool {
        self.state() == HoldState::Holding
    }

    /// Start holding. Any previous timer is stopped first.
    pub fn press<F>(&mut self, handle: &Handle, mut tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.release();
        debug!("Hold started ({:?} interval)", self.period);

        tick();

        let period = self.period;
        self.timer = Some(handle.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                tick();
            }
        }));
    }

    /// Stop future ticks. Work already started by earlier ticks keeps running.
    pub fn release(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("Hold released");
        }
    }
}

impl Drop for HoldController {
    fn drop(&mut self) {
        self.release();
    }
}
