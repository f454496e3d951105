//! Trait definitions for host collaborators.
//!
//! This module defines traits for:
//! - [`EventSource`]: Register and remove interaction listeners
//! - [`FrameSource`]: Per-frame callbacks with a monotonic timestamp
//! - [`Surface`]: Visibility and scroll position queries
//! - [`Reporter`]: Sink for verdict reports
//!
//! It also re-exports shared types from the `types` submodule.
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use fps_monitor::traits::{EventKind, HostEvent};
//!
//! let kind: EventKind = "scroll".parse().unwrap();
//! let event = HostEvent::new(kind);
//! assert_eq!(event.kind.as_str(), "scroll");
//! ```

mod types;

pub use types::{EventKind, HostEvent, UnknownEventKind};

use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::ReportError;
use crate::monitor::Report;

/// Listener invoked by an [`EventSource`] for each dispatched event.
pub type EventHandler = Arc<dyn Fn(HostEvent) + Send + Sync>;

/// Interaction event source.
///
/// Holds at most one handler per event kind. Implementations must not hold
/// internal locks while invoking a handler: handlers may call back into
/// [`EventSource::unsubscribe`].
#[cfg_attr(test, mockall::automock)]
pub trait EventSource: Send + Sync {
    /// Register `handler` for `kind`, replacing any existing handler.
    fn subscribe(&self, kind: EventKind, handler: EventHandler);

    /// Remove the handler for `kind`, if any.
    fn unsubscribe(&self, kind: EventKind);
}

/// Frame-callback scheduler.
///
/// Each call to [`FrameSource::next_frame`] requests one callback and
/// resolves with the frame's monotonic timestamp. Dropping the future
/// withdraws the request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Wait for the next frame.
    async fn next_frame(&self) -> Instant;
}

/// Host surface state.
#[cfg_attr(test, mockall::automock)]
pub trait Surface: Send + Sync {
    /// Returns true if the surface is hidden or backgrounded.
    fn is_hidden(&self) -> bool;

    /// Current vertical scroll offset, if the host exposes one.
    fn scroll_offset(&self) -> Option<f64>;
}

/// Verdict report sink.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter: Send + Sync {
    /// Deliver a report.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the sink cannot accept the report.
    fn report(&self, report: &Report) -> Result<(), ReportError>;
}

impl<F> Reporter for F
where
    F: Fn(&Report) -> Result<(), ReportError> + Send + Sync,
{
    fn report(&self, report: &Report) -> Result<(), ReportError> {
        self(report)
    }
}
