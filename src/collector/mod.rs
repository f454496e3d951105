//! Periodic FPS sampling.
//!
//! A [`SampleCollector`] runs at most one collection session at a time. A
//! session drives a frame loop on a [`FrameSource`], folds frames into
//! fixed-length periods (one FPS sample per period), feeds inter-frame
//! durations to the shared refresh-rate estimator, and resolves when the
//! collection window elapses or the session is cancelled.
//!
//! Concurrent [`SampleCollector::collect`] calls share the in-flight result.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() -> Result<(), fps_monitor::error::CollectError> {
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fps_monitor::collector::SampleCollector;
//! use fps_monitor::host::IntervalFrames;
//! use fps_monitor::refresh::SharedEstimator;
//!
//! let frames = Arc::new(IntervalFrames::from_hz(60));
//! let collector = SampleCollector::new(
//!     frames,
//!     SharedEstimator::new(),
//!     Duration::from_secs(5),
//!     Duration::from_secs(1),
//! );
//! let collection = collector.collect().await?;
//! println!("samples: {:?}", collection.samples);
//! # Ok(())
//! # }
//! ```

mod session;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use self::session::SessionState;
use crate::error::{CancelReason, CollectError};
use crate::refresh::SharedEstimator;
use crate::traits::FrameSource;

/// Result of one completed collection session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// FPS samples in chronological order.
    pub samples: Vec<u32>,
    /// Total frame callbacks the session received.
    pub frame_callbacks: u64,
}

/// Cloneable handle to an in-flight collection result.
pub type CollectHandle = Shared<BoxFuture<'static, Result<Collection, CollectError>>>;

type Completion = oneshot::Sender<Result<Collection, CollectError>>;

/// The occupant of the single-flight slot.
struct ActiveSession {
    id: u64,
    state: SessionState,
    completion: Completion,
    handle: CollectHandle,
    task: JoinHandle<()>,
}

struct Inner {
    frames: Arc<dyn FrameSource>,
    estimator: SharedEstimator,
    window: Duration,
    interval: Duration,
    active: Mutex<Option<ActiveSession>>,
    next_id: AtomicU64,
}

impl Inner {
    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveSession>> {
        self.active.lock().unwrap_or_else(|poison_error| {
            tracing::warn!("Collector lock poisoned, using recovered state");
            PoisonError::into_inner(poison_error)
        })
    }

    /// Fold a frame into session `id`. Returns false once the session is gone.
    fn record_frame(&self, id: u64, at: Instant) -> bool {
        let mut active = self.lock_active();
        match active.as_mut() {
            Some(session) if session.id == id => {
                session.state.record_frame(at, &mut self.estimator.lock());
                true
            }
            _ => false,
        }
    }

    /// Resolve session `id` with the samples gathered so far.
    fn complete(&self, id: u64) {
        let session = {
            let mut active = self.lock_active();
            match active.as_ref() {
                Some(session) if session.id == id => active.take(),
                _ => None,
            }
        };

        if let Some(session) = session {
            let collection = session.state.finish();
            tracing::debug!(
                session = id,
                samples = collection.samples.len(),
                frame_callbacks = collection.frame_callbacks,
                "Collection window elapsed"
            );
            let _ = session.completion.send(Ok(collection));
        }
    }
}

/// Single-flight FPS sample collector.
///
/// Cheap to clone; clones share the same session slot.
#[derive(Clone)]
pub struct SampleCollector {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SampleCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleCollector")
            .field("window", &self.inner.window)
            .field("interval", &self.inner.interval)
            .field("collecting", &self.is_collecting())
            .finish_non_exhaustive()
    }
}

impl SampleCollector {
    /// Create a collector.
    ///
    /// `window` bounds each session; `interval` is the aggregation period of
    /// one sample.
    #[must_use]
    pub fn new(
        frames: Arc<dyn FrameSource>,
        estimator: SharedEstimator,
        window: Duration,
        interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                frames,
                estimator,
                window,
                interval,
                active: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Start a collection session, or join the one in flight.
    ///
    /// The returned handle resolves within the collection window even if no
    /// frame ever fires. Must be called from within a tokio runtime.
    pub fn collect(&self) -> CollectHandle {
        let mut active = self.inner.lock_active();
        if let Some(session) = active.as_ref() {
            tracing::trace!(session = session.id, "Joining in-flight collection");
            return session.handle.clone();
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (completion, receiver) = oneshot::channel();
        let handle = receiver
            .map(|received| received.unwrap_or(Err(CollectError::Interrupted)))
            .boxed()
            .shared();

        let deadline = Instant::now() + self.inner.window;
        let task = tokio::spawn(drive(Arc::clone(&self.inner), id, deadline));

        tracing::debug!(
            session = id,
            window_ms = self.inner.window.as_millis(),
            interval_ms = self.inner.interval.as_millis(),
            "Collection started"
        );

        *active = Some(ActiveSession {
            id,
            state: SessionState::new(self.inner.interval),
            completion,
            handle: handle.clone(),
            task,
        });
        handle
    }

    /// Cancel the in-flight session, rejecting its result with `reason`.
    ///
    /// The result settles before this returns. Returns false, doing
    /// nothing, when idle.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let Some(session) = self.inner.lock_active().take() else {
            return false;
        };

        session.task.abort();
        tracing::debug!(session = session.id, %reason, "Collection cancelled");
        let _ = session
            .completion
            .send(Err(CollectError::Cancelled { reason }));
        true
    }

    /// Returns true while a session occupies the slot.
    #[must_use]
    pub fn is_collecting(&self) -> bool {
        self.inner.lock_active().is_some()
    }

    /// Shared refresh-rate estimator the sessions write to.
    #[must_use]
    pub fn estimator(&self) -> &SharedEstimator {
        &self.inner.estimator
    }
}

/// Frame loop of session `id`, racing the collection deadline.
async fn drive(inner: Arc<Inner>, id: u64, deadline: Instant) {
    let window = tokio::time::sleep_until(deadline);
    tokio::pin!(window);

    loop {
        tokio::select! {
            biased;
            () = &mut window => {
                inner.complete(id);
                return;
            }
            at = inner.frames.next_frame() => {
                if !inner.record_frame(id, at) {
                    return;
                }
            }
        }
    }
}
