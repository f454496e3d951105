//! Low-fps classification.

use super::types::FpsStats;
use crate::collector::Collection;

/// Fps floor for a collection.
///
/// An explicit threshold wins when nonzero; otherwise the floor is a fraction
/// of the rated refresh rate.
#[must_use]
pub fn low_fps_threshold(low_threshold: f64, low_threshold_percent: f64, rated_fps: u32) -> f64 {
    if low_threshold > 0.0 {
        low_threshold
    } else {
        f64::from(rated_fps) * low_threshold_percent
    }
}

/// Classify a completed collection.
///
/// A sample is low when it is at or below `threshold`. The session is low
/// when it produced no samples, or when the share of low samples reaches
/// `low_sample_percent`. The reported share is rounded to one decimal after
/// the comparison.
#[must_use]
pub fn classify(
    collection: Collection,
    threshold: f64,
    low_sample_percent: f64,
    rated_fps: u32,
) -> FpsStats {
    let Collection {
        samples,
        frame_callbacks,
    } = collection;

    let low_samples: Vec<u32> = samples
        .iter()
        .copied()
        .filter(|fps| f64::from(*fps) <= threshold)
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let low_percent = if samples.is_empty() {
        0.0
    } else {
        low_samples.len() as f64 / samples.len() as f64
    };

    FpsStats {
        is_low: samples.is_empty() || low_percent >= low_sample_percent,
        samples,
        low_samples,
        low_percent: (low_percent * 10.0).round() / 10.0,
        rated_fps,
        frame_callbacks,
    }
}
