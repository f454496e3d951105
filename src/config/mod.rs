//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//!
//! [`MonitorConfig`] carries the sampling and classification parameters and
//! is what [`crate::monitor::FpsMonitor`] consumes. [`Config`] wraps it with
//! the settings the `fps-monitor` binary needs.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use fps_monitor::config::{validate_monitor_config, MonitorConfig};
//!
//! let config = MonitorConfig {
//!     collect_duration: Duration::from_secs(5),
//!     collect_interval: Duration::from_secs(1),
//!     ..MonitorConfig::default()
//! };
//! assert!(validate_monitor_config(&config).is_ok());
//! ```

mod validation;

pub use validation::{
    validate_config, validate_monitor_config, MAX_LOW_THRESHOLD, MAX_SIMULATED_REFRESH_HZ,
};

use std::time::Duration;

use crate::error::ConfigError;
use crate::traits::EventKind;

/// Default absolute low-fps threshold (0 = derive from the rated rate).
pub const DEFAULT_LOW_THRESHOLD: f64 = 0.0;

/// Default fraction of the rated rate below which a sample is low.
pub const DEFAULT_LOW_THRESHOLD_PERCENT: f64 = 0.5;

/// Default fraction of low samples that classifies a session as low.
pub const DEFAULT_LOW_SAMPLE_PERCENT: f64 = 0.5;

/// Default collection window in milliseconds.
pub const DEFAULT_COLLECT_DURATION_MS: u64 = 10_000;

/// Default aggregation period in milliseconds.
pub const DEFAULT_COLLECT_INTERVAL_MS: u64 = 1_000;

/// Default trigger ceiling (0 = unlimited).
pub const DEFAULT_COLLECT_MAX_COUNT: u32 = 0;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default refresh rate of the binary's simulated frame source.
pub const DEFAULT_SIMULATED_REFRESH_HZ: u32 = 60;

/// Sampling and classification parameters.
///
/// Immutable once handed to the monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Absolute fps floor. When nonzero it replaces the relative threshold.
    pub low_threshold: f64,
    /// Fraction of the rated refresh rate used as the fps floor (0.0-1.0).
    pub low_threshold_percent: f64,
    /// Fraction of low samples required to classify a session as low (0.0-1.0).
    pub low_sample_percent: f64,
    /// Total collection window.
    pub collect_duration: Duration,
    /// Aggregation period for one sample.
    pub collect_interval: Duration,
    /// Triggers allowed before the monitor stops itself (0 = unlimited).
    pub collect_max_count: u32,
    /// Event kinds that trigger a collection.
    pub monitor_events: Vec<EventKind>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            low_threshold: DEFAULT_LOW_THRESHOLD,
            low_threshold_percent: DEFAULT_LOW_THRESHOLD_PERCENT,
            low_sample_percent: DEFAULT_LOW_SAMPLE_PERCENT,
            collect_duration: Duration::from_millis(DEFAULT_COLLECT_DURATION_MS),
            collect_interval: Duration::from_millis(DEFAULT_COLLECT_INTERVAL_MS),
            collect_max_count: DEFAULT_COLLECT_MAX_COUNT,
            monitor_events: EventKind::DEFAULT_TRIGGERS.to_vec(),
        }
    }
}

impl MonitorConfig {
    /// Load monitor parameters from environment variables.
    ///
    /// Optional environment variables (with defaults):
    /// - `FPS_LOW_THRESHOLD`: absolute fps floor (default: `0`, unset)
    /// - `FPS_LOW_THRESHOLD_PERCENT`: relative fps floor (default: `0.5`)
    /// - `FPS_LOW_SAMPLE_PERCENT`: low sample fraction (default: `0.5`)
    /// - `FPS_COLLECT_DURATION_MS`: collection window (default: `10000`)
    /// - `FPS_COLLECT_INTERVAL_MS`: aggregation period (default: `1000`)
    /// - `FPS_COLLECT_MAX_COUNT`: trigger ceiling (default: `0`)
    /// - `FPS_MONITOR_EVENTS`: comma-separated event kinds
    ///   (default: `DOMContentLoaded,scroll,click,focus`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable cannot be parsed or the result
    /// fails [`validate_monitor_config`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            low_threshold: parse_env_f64("FPS_LOW_THRESHOLD", DEFAULT_LOW_THRESHOLD)?,
            low_threshold_percent: parse_env_f64(
                "FPS_LOW_THRESHOLD_PERCENT",
                DEFAULT_LOW_THRESHOLD_PERCENT,
            )?,
            low_sample_percent: parse_env_f64(
                "FPS_LOW_SAMPLE_PERCENT",
                DEFAULT_LOW_SAMPLE_PERCENT,
            )?,
            collect_duration: Duration::from_millis(parse_env_u64(
                "FPS_COLLECT_DURATION_MS",
                DEFAULT_COLLECT_DURATION_MS,
            )?),
            collect_interval: Duration::from_millis(parse_env_u64(
                "FPS_COLLECT_INTERVAL_MS",
                DEFAULT_COLLECT_INTERVAL_MS,
            )?),
            collect_max_count: parse_env_u32("FPS_COLLECT_MAX_COUNT", DEFAULT_COLLECT_MAX_COUNT)?,
            monitor_events: parse_env_events("FPS_MONITOR_EVENTS")?,
        };

        validate_monitor_config(&config)?;
        Ok(config)
    }
}

/// Application configuration for the `fps-monitor` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sampling and classification parameters.
    pub monitor: MonitorConfig,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Refresh rate of the simulated frame source, in Hz.
    pub simulated_refresh_hz: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            simulated_refresh_hz: DEFAULT_SIMULATED_REFRESH_HZ,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reads everything [`MonitorConfig::from_env`] reads, plus:
    /// - `LOG_LEVEL`: Logging level (default: `info`)
    /// - `FPS_SIMULATED_REFRESH_HZ`: simulated display rate (default: `60`)
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any value cannot be parsed or fails
    /// validation (see [`validate_config`]).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let monitor = MonitorConfig::from_env()?;
        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());
        let simulated_refresh_hz =
            parse_env_u32("FPS_SIMULATED_REFRESH_HZ", DEFAULT_SIMULATED_REFRESH_HZ)?;

        let config = Self {
            monitor,
            log_level,
            simulated_refresh_hz,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

/// Parse an environment variable as u32, using a default if not set.
fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}

/// Parse an environment variable as f64, using a default if not set.
fn parse_env_f64(name: &str, default: f64) -> Result<f64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a number".into(),
        })
    })
}

/// Parse a comma-separated list of event kinds, using the defaults if not set.
fn parse_env_events(name: &str) -> Result<Vec<EventKind>, ConfigError> {
    let Ok(val) = std::env::var(name) else {
        return Ok(EventKind::DEFAULT_TRIGGERS.to_vec());
    };

    let mut events = Vec::new();
    for part in val.split(',').filter(|p| !p.trim().is_empty()) {
        let kind: EventKind = part.parse().map_err(|e| ConfigError::InvalidValue {
            var: name.into(),
            reason: format!("{e}"),
        })?;
        if !events.contains(&kind) {
            events.push(kind);
        }
    }
    Ok(events)
}
