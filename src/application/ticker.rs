//! One-second cadence timer driving the elapsed-time counter

use std::time::Duration as StdDuration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Period between ticks while recording
pub const TICK_PERIOD: StdDuration = StdDuration::from_secs(1);

/// Recurring timer. The first tick fires one full period after creation,
/// so a fresh ticker never counts a second that has not elapsed.
/// Dropping it cancels it.
#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
}

impl Ticker {
    pub fn new(period: StdDuration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Ticker with the standard one-second period
    pub fn every_second() -> Self {
        Self::new(TICK_PERIOD)
    }

    /// Wait for the next tick. Cancel-safe.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
