//! Error types for the FPS monitor.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`ConfigError`]: Configuration errors
//! - [`CollectError`]: Sample collection errors, including cancellation
//! - [`ReportError`]: Report sink errors
//!
//! All errors implement `Send + Sync` for async compatibility.

use std::fmt;

use thiserror::Error;

/// Top-level application error.
///
/// This is the main error type returned by the binary and by callers that
/// want a single error type across subsystems.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Collection error.
    #[error("Collection error: {0}")]
    Collect(#[from] CollectError),

    /// Report error.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}

/// Why an in-flight collection was cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The host window lost focus.
    LostFocus,
    /// The monitor was stopped, explicitly or by the trigger ceiling.
    MonitorStopped,
    /// Caller-supplied reason.
    Other(String),
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LostFocus => f.write_str("window lost focus, fps collection stopped"),
            Self::MonitorStopped => f.write_str("fps monitor stopped, fps collection stopped"),
            Self::Other(reason) => f.write_str(reason),
        }
    }
}

/// Sample collection errors.
///
/// Cancellation is an expected outcome, not a fault: callers on the trigger
/// path log it and move on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// The collection was cancelled before its window elapsed.
    #[error("Collection cancelled: {reason}")]
    Cancelled {
        /// Why the collection was cancelled.
        reason: CancelReason,
    },

    /// The collection ended without producing a result.
    #[error("Collection interrupted before completion")]
    Interrupted,

    /// The monitor was constructed with an invalid configuration.
    #[error("Monitor is inactive: configuration was rejected")]
    Inactive,
}

impl CollectError {
    /// Returns true if this error is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Report sink errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The sink failed to accept the report.
    #[error("Report failed: {message}")]
    Failed {
        /// Description of the failure.
        message: String,
    },

    /// The report could not be serialized.
    #[error("Report serialization failed: {message}")]
    Serialization {
        /// Description of the serialization failure.
        message: String,
    },
}
