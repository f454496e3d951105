//! Timer-driven frame source.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::traits::FrameSource;

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Frame source ticking at a fixed period on the tokio timer.
///
/// Stands in for a display's vsync when no real compositor clock is
/// available. Ticks are laid on a fixed grid starting at the first request;
/// frames nobody waited for are skipped, as a display would drop them, so a
/// request after an idle gap resolves on the next grid point rather than
/// with a stale timestamp.
#[derive(Debug)]
pub struct IntervalFrames {
    period: Duration,
    interval: Mutex<Option<Interval>>,
}

impl IntervalFrames {
    /// Create a source with the given frame period (at least 1ms).
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            interval: Mutex::new(None),
        }
    }

    /// Create a source running at `hz` frames per second.
    ///
    /// A rate of 0 is treated as 1.
    #[must_use]
    pub fn from_hz(hz: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / f64::from(hz.max(1))))
    }

    /// Frame period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl FrameSource for IntervalFrames {
    async fn next_frame(&self) -> Instant {
        let mut guard = self.interval.lock().await;
        let interval = guard.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        loop {
            let at = interval.tick().await;
            if Instant::now().saturating_duration_since(at) < self.period {
                return at;
            }
        }
    }
}
