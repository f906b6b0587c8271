//! Animation loop — a periodic frame counter that drives status re-renders.
//!
//! The loop never touches display state. It only yields frame numbers; the
//! session that owns it decides whether to render, checking
//! [`AnimationLoop::is_finished`] at the render site.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::debug;

#[derive(Debug)]
pub struct AnimationLoop {
    period: Duration,
    interval: Option<Interval>,
    frame: u64,
    finished: bool,
}

impl AnimationLoop {
    /// Create a stopped loop. Nothing ticks until [`start`](Self::start).
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
            frame: 0,
            finished: false,
        }
    }

    /// Begin ticking. The first tick fires one period from now.
    /// No-op once cancelled or already started.
    pub fn start(&mut self) {
        if self.finished || self.interval.is_some() {
            return;
        }
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    /// Wait for the next tick and return the advanced frame number.
    ///
    /// Pending forever when the loop is not running, so it can sit in a
    /// `select!` next to the chunk receiver.
    pub async fn tick(&mut self) -> u64 {
        if self.finished {
            return std::future::pending().await;
        }
        let Some(interval) = self.interval.as_mut() else {
            return std::future::pending().await;
        };
        interval.tick().await;
        self.frame += 1;
        self.frame
    }

    /// Stop the loop. Returns `false` if it was already stopped.
    ///
    /// Safe on a loop that never started.
    pub fn cancel(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.finished = true;
        self.interval = None;
        debug!(frames = self.frame, "Animation loop cancelled");
        true
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// The most recent frame number (0 before the first tick).
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
