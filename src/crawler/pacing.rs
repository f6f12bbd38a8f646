//! Politeness pacing
//!
//! Every outbound request is preceded by one fixed-length pause. The pause
//! blocks the whole crawl loop, not only the request that follows it.

use std::time::Duration;

/// Fixed politeness delay with a running count of pauses taken
#[derive(Debug, Clone)]
pub struct Politeness {
    interval: Duration,
    delays: u64,
}

impl Politeness {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            delays: 0,
        }
    }

    /// Sleeps for the politeness interval
    ///
    /// A zero interval still counts as a delay, so the pacing contract can be
    /// checked without slowing tests down.
    pub async fn pause(&mut self) {
        self.delays += 1;
        if !self.interval.is_zero() {
            tokio::time::sleep(self.interval).await;
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of pauses taken so far
    pub fn delays(&self) -> u64 {
        self.delays
    }
}
