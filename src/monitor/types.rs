//! Verdict and report types.

use serde::{Deserialize, Serialize};

use crate::traits::HostEvent;

/// Low-fps verdict for one completed collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FpsStats {
    /// True when the share of low samples met the configured fraction, or
    /// when the collection produced no samples.
    pub is_low: bool,
    /// All samples in chronological order.
    pub samples: Vec<u32>,
    /// Samples at or below the low-fps threshold.
    pub low_samples: Vec<u32>,
    /// Share of low samples, rounded to one decimal.
    pub low_percent: f64,
    /// Rated refresh rate at classification time (0 = unrated).
    pub rated_fps: u32,
    /// Frame callbacks received during the collection.
    pub frame_callbacks: u64,
}

/// Context captured around a classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraData {
    /// Scroll offset before and after the collection, rounded.
    pub scroll_y: [i64; 2],
}

/// What the monitor hands to the report sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// The verdict.
    pub stats: FpsStats,
    /// The event that triggered the collection.
    pub event: HostEvent,
    /// Surrounding context.
    pub extra: ExtraData,
}

/// Lifecycle phase of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorPhase {
    /// No listeners registered.
    Idle,
    /// Listeners registered, no classification in progress.
    Armed,
    /// A triggered classification is in progress.
    Collecting,
}

impl std::fmt::Display for MonitorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Armed => "armed",
            Self::Collecting => "collecting",
        };
        f.write_str(name)
    }
}
