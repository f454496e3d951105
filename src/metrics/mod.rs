//! Monitor counters.
//!
//! This module provides process-local counters for the trigger path:
//! - Accepted triggers and delivered reports
//! - Triggers ignored because a collection was in flight or the surface
//!   was hidden
//! - Cancelled collections and failed reports
//! - Low-fps verdicts
//!
//! # Example
//!
//! ```
//! use fps_monitor::metrics::MonitorMetrics;
//!
//! let metrics = MonitorMetrics::new();
//! metrics.record_trigger();
//! metrics.record_report(true);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.triggers, 1);
//! assert_eq!(snapshot.reports, 1);
//! assert_eq!(snapshot.low_verdicts, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Why a trigger was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A classification was already in progress.
    Busy,
    /// The surface was hidden.
    Hidden,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Triggers that started (or joined) a classification.
    pub triggers: u64,
    /// Reports delivered to the sink.
    pub reports: u64,
    /// Reports whose verdict was low.
    pub low_verdicts: u64,
    /// Reports the sink rejected.
    pub report_failures: u64,
    /// Collections cancelled before their window elapsed.
    pub cancellations: u64,
    /// Triggers ignored while busy.
    pub ignored_busy: u64,
    /// Triggers ignored while hidden.
    pub ignored_hidden: u64,
}

/// Thread-safe monitor counters.
#[derive(Debug, Default)]
pub struct MonitorMetrics {
    triggers: AtomicU64,
    reports: AtomicU64,
    low_verdicts: AtomicU64,
    report_failures: AtomicU64,
    cancellations: AtomicU64,
    ignored_busy: AtomicU64,
    ignored_hidden: AtomicU64,
}

impl MonitorMetrics {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted trigger.
    pub fn record_trigger(&self) {
        self.triggers.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a delivered report.
    pub fn record_report(&self, is_low: bool) {
        self.reports.fetch_add(1, Ordering::Relaxed);
        if is_low {
            self.low_verdicts.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a report the sink rejected.
    pub fn record_report_failure(&self) {
        self.report_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cancelled collection.
    pub fn record_cancellation(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an ignored trigger.
    pub fn record_ignored(&self, reason: IgnoreReason) {
        let counter = match reason {
            IgnoreReason::Busy => &self.ignored_busy,
            IgnoreReason::Hidden => &self.ignored_hidden,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            triggers: self.triggers.load(Ordering::Relaxed),
            reports: self.reports.load(Ordering::Relaxed),
            low_verdicts: self.low_verdicts.load(Ordering::Relaxed),
            report_failures: self.report_failures.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            ignored_busy: self.ignored_busy.load(Ordering::Relaxed),
            ignored_hidden: self.ignored_hidden.load(Ordering::Relaxed),
        }
    }
}
