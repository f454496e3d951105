//! Integration tests for the FPS monitor.
//!
//! These tests drive the public API end to end with the `host`
//! implementations on a paused tokio clock.

mod cancellation;
mod classification;
mod harness;
mod trigger_workflow;
