//! Display refresh-rate inference.
//!
//! No host API reports the native refresh rate, so it is inferred from
//! inter-frame durations: each duration is bucketed into a [`RefreshTier`],
//! and the first tier (fastest first) that collects more than
//! [`EVIDENCE_THRESHOLD`] observations freezes the rated rate for the rest of
//! the process lifetime.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use fps_monitor::refresh::RefreshRateEstimator;
//!
//! let mut estimator = RefreshRateEstimator::new();
//! for _ in 0..4 {
//!     estimator.observe(Duration::from_micros(16_667));
//! }
//! assert_eq!(estimator.rated_rate(), 60);
//! assert!(estimator.is_frozen());
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Observations a tier needs to exceed before it freezes the rated rate.
pub const EVIDENCE_THRESHOLD: u32 = 3;

/// Refresh-rate tier, fastest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshTier {
    /// Frames shorter than 8ms.
    UltraHigh,
    /// Frames in `[8ms, 16ms)`.
    High,
    /// Frames in `[16ms, 33ms)`.
    Normal,
    /// Frames of 33ms or longer.
    Low,
}

impl RefreshTier {
    /// All tiers in inspection order, fastest first.
    pub const ALL: [Self; 4] = [Self::UltraHigh, Self::High, Self::Normal, Self::Low];

    /// Classify an inter-frame duration.
    #[must_use]
    pub fn classify(frame_time: Duration) -> Self {
        if frame_time < Duration::from_millis(8) {
            Self::UltraHigh
        } else if frame_time < Duration::from_millis(16) {
            Self::High
        } else if frame_time < Duration::from_millis(33) {
            Self::Normal
        } else {
            Self::Low
        }
    }

    /// Refresh rate associated with the tier, in Hz.
    #[must_use]
    pub const fn rate(self) -> u32 {
        match self {
            Self::UltraHigh => 144,
            Self::High => 120,
            Self::Normal => 60,
            Self::Low => 30,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::UltraHigh => 0,
            Self::High => 1,
            Self::Normal => 2,
            Self::Low => 3,
        }
    }
}

/// Infers and freezes the display's rated refresh rate.
///
/// Counters only move while the estimator is unfrozen. A failed freeze
/// attempt resets them, so sub-threshold noise from one collection window
/// never carries into the next.
#[derive(Debug, Clone, Default)]
pub struct RefreshRateEstimator {
    counts: [u32; 4],
    frozen: Option<u32>,
}

impl RefreshRateEstimator {
    /// Create an unrated estimator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one inter-frame duration. No-op once frozen.
    pub fn observe(&mut self, frame_time: Duration) {
        if self.frozen.is_some() {
            return;
        }
        let slot = &mut self.counts[RefreshTier::classify(frame_time).index()];
        *slot = slot.saturating_add(1);
    }

    /// Attempt to freeze the rated rate from the counters seen so far.
    ///
    /// Returns the frozen rate, or `None` after resetting every counter when
    /// no tier has enough evidence.
    pub fn try_freeze(&mut self) -> Option<u32> {
        if self.frozen.is_some() {
            return self.frozen;
        }

        let qualifying = RefreshTier::ALL
            .into_iter()
            .find(|tier| self.counts[tier.index()] > EVIDENCE_THRESHOLD);

        match qualifying {
            Some(tier) => {
                tracing::debug!(
                    rate = tier.rate(),
                    counts = ?self.counts,
                    "Rated refresh rate frozen"
                );
                self.frozen = Some(tier.rate());
            }
            None => {
                tracing::trace!(counts = ?self.counts, "Insufficient evidence, resetting tiers");
                self.counts = [0; 4];
            }
        }
        self.frozen
    }

    /// Frozen rate in Hz, or 0 while unrated.
    #[must_use]
    pub fn current_rate(&self) -> u32 {
        self.frozen.unwrap_or(0)
    }

    /// Freeze if possible and return the rated rate (0 while unrated).
    pub fn rated_rate(&mut self) -> u32 {
        self.try_freeze();
        self.current_rate()
    }

    /// Returns true once a rate has been frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Observation count for a tier.
    #[must_use]
    pub const fn tier_count(&self, tier: RefreshTier) -> u32 {
        self.counts[tier.index()]
    }
}

/// Shared handle to the process-wide estimator.
///
/// The active collection session writes through it; the monitor reads the
/// rated rate through it when classifying.
#[derive(Debug, Clone, Default)]
pub struct SharedEstimator(Arc<Mutex<RefreshRateEstimator>>);

impl SharedEstimator {
    /// Create a handle to a fresh, unrated estimator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the estimator, recovering from a poisoned lock.
    pub fn lock(&self) -> MutexGuard<'_, RefreshRateEstimator> {
        self.0.lock().unwrap_or_else(|poison_error| {
            tracing::warn!("Estimator lock poisoned, using recovered state");
            PoisonError::into_inner(poison_error)
        })
    }

    /// See [`RefreshRateEstimator::observe`].
    pub fn observe(&self, frame_time: Duration) {
        self.lock().observe(frame_time);
    }

    /// See [`RefreshRateEstimator::rated_rate`].
    #[must_use]
    pub fn rated_rate(&self) -> u32 {
        self.lock().rated_rate()
    }

    /// See [`RefreshRateEstimator::current_rate`].
    #[must_use]
    pub fn current_rate(&self) -> u32 {
        self.lock().current_rate()
    }
}
