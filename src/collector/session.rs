//! Per-session frame accumulator.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::time::Duration;

use tokio::time::Instant;

use super::Collection;
use crate::refresh::RefreshRateEstimator;

/// Frame accounting for one collection session.
#[derive(Debug)]
pub(crate) struct SessionState {
    interval: Duration,
    period_start: Option<Instant>,
    period_frames: u32,
    last_frame: Option<Instant>,
    samples: Vec<u32>,
    frame_callbacks: u64,
}

impl SessionState {
    pub(crate) const fn new(interval: Duration) -> Self {
        Self {
            interval,
            period_start: None,
            period_frames: 0,
            last_frame: None,
            samples: Vec::new(),
            frame_callbacks: 0,
        }
    }

    /// Account for one frame callback fired at `at`.
    pub(crate) fn record_frame(&mut self, at: Instant, estimator: &mut RefreshRateEstimator) {
        self.frame_callbacks += 1;

        let (Some(period_start), Some(last_frame)) = (self.period_start, self.last_frame) else {
            // Nothing to diff against on the first frame
            self.period_start = Some(at);
            self.last_frame = Some(at);
            return;
        };

        self.period_frames += 1;
        estimator.observe(at.saturating_duration_since(last_frame));

        let elapsed = at.saturating_duration_since(period_start);
        if elapsed >= self.interval {
            let fps = (f64::from(self.period_frames) / elapsed.as_secs_f64()).round() as u32;
            self.samples.push(fps);
            self.period_start = Some(at);
            self.period_frames = 0;
        }

        self.last_frame = Some(at);
    }

    /// Close the session. The trailing partial period is dropped.
    pub(crate) fn finish(self) -> Collection {
        Collection {
            samples: self.samples,
            frame_callbacks: self.frame_callbacks,
        }
    }
}
