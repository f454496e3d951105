//! FPS Monitor
//!
//! Frame-rate sampling and low-fps classification for interactive surfaces.
//!
//! # Features
//!
//! - Refresh-rate inference from inter-frame timing (144/120/60/30 Hz tiers)
//! - Periodic FPS sampling over a bounded collection window
//! - Low-fps verdicts against a fixed or rated-relative threshold
//! - Trigger-driven collection with single-flight sessions, a trigger
//!   ceiling and cancellation on focus loss
//!
//! # Quick Start
//!
//! ```bash
//! FPS_COLLECT_DURATION_MS=5000 ./fps-monitor
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  events   ┌────────────┐  collect  ┌─────────────────┐
//! │ EventSource │──────────▶│ FpsMonitor │──────────▶│ SampleCollector │◀── FrameSource
//! └─────────────┘           └─────┬──────┘           └────────┬────────┘
//!                                 │ Report                    │ frame times
//!                                 ▼                           ▼
//!                             Reporter              RefreshRateEstimator
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod collector;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod monitor;
pub mod refresh;
pub mod traits;
