//! Configuration validation.
//!
//! This module provides validation logic for configuration values,
//! ensuring they are within acceptable ranges.

use super::{Config, MonitorConfig};
use crate::error::ConfigError;
use crate::refresh::RefreshTier;

/// Exclusive upper bound of the absolute low-fps threshold.
///
/// A floor at or above the common 60 Hz display rate would classify every
/// sample on such a display as low.
pub const MAX_LOW_THRESHOLD: f64 = RefreshTier::Normal.rate() as f64;

/// Maximum refresh rate of the simulated frame source.
pub const MAX_SIMULATED_REFRESH_HZ: u32 = 500;

/// Validate monitor parameters.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if any value is out of range:
/// - `FPS_COLLECT_DURATION_MS` must be positive
/// - `FPS_COLLECT_INTERVAL_MS` must be positive and not exceed the duration
/// - `FPS_LOW_THRESHOLD` must be 0 or within `(0, 60)`
/// - `FPS_LOW_THRESHOLD_PERCENT` must be within `[0, 1]`
/// - `FPS_LOW_SAMPLE_PERCENT` must be within `[0, 1]`
/// - `FPS_MONITOR_EVENTS` must not contain `blur`
pub fn validate_monitor_config(config: &MonitorConfig) -> Result<(), ConfigError> {
    if config.collect_duration.is_zero() {
        return Err(ConfigError::InvalidValue {
            var: "FPS_COLLECT_DURATION_MS".into(),
            reason: "must be a positive integer".into(),
        });
    }

    if config.collect_interval.is_zero() {
        return Err(ConfigError::InvalidValue {
            var: "FPS_COLLECT_INTERVAL_MS".into(),
            reason: "must be a positive integer".into(),
        });
    }

    // An interval longer than the window would never complete a sample
    if config.collect_interval > config.collect_duration {
        return Err(ConfigError::InvalidValue {
            var: "FPS_COLLECT_INTERVAL_MS".into(),
            reason: "must not exceed FPS_COLLECT_DURATION_MS".into(),
        });
    }

    if !config.low_threshold.is_finite()
        || config.low_threshold < 0.0
        || config.low_threshold >= MAX_LOW_THRESHOLD
    {
        return Err(ConfigError::InvalidValue {
            var: "FPS_LOW_THRESHOLD".into(),
            reason: format!("must be 0 (unset) or a number below {MAX_LOW_THRESHOLD}"),
        });
    }

    validate_fraction("FPS_LOW_THRESHOLD_PERCENT", config.low_threshold_percent)?;
    validate_fraction("FPS_LOW_SAMPLE_PERCENT", config.low_sample_percent)?;

    if config.monitor_events.iter().any(|kind| !kind.is_trigger()) {
        return Err(ConfigError::InvalidValue {
            var: "FPS_MONITOR_EVENTS".into(),
            reason: "blur is reserved for focus-loss cancellation".into(),
        });
    }

    Ok(())
}

/// Validate application configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if the monitor parameters are
/// invalid (see [`validate_monitor_config`]) or `FPS_SIMULATED_REFRESH_HZ` is
/// outside `1..=500`.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_monitor_config(&config.monitor)?;

    if config.simulated_refresh_hz == 0 || config.simulated_refresh_hz > MAX_SIMULATED_REFRESH_HZ
    {
        return Err(ConfigError::InvalidValue {
            var: "FPS_SIMULATED_REFRESH_HZ".into(),
            reason: format!("must be between 1 and {MAX_SIMULATED_REFRESH_HZ}"),
        });
    }

    Ok(())
}

fn validate_fraction(var: &str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            var: var.into(),
            reason: "must be between 0 and 1".into(),
        })
    }
}
