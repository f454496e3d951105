//! Trigger-driven FPS monitoring.
//!
//! [`FpsMonitor`] registers listeners for the configured interaction events.
//! Each qualifying event starts one collection through the
//! [`SampleCollector`], classifies the samples and hands a [`Report`] to the
//! configured [`Reporter`]. Focus loss and [`FpsMonitor::stop_monitor`]
//! cancel the in-flight collection.
//!
//! Lifecycle: `Idle -> Armed -> Collecting -> Armed -> ... -> Idle`.
//!
//! # Example
//!
//! ```no_run
//! # async fn run() {
//! use std::sync::Arc;
//! use fps_monitor::config::MonitorConfig;
//! use fps_monitor::host::{EventBus, IntervalFrames, JsonLinesReporter, SurfaceState};
//! use fps_monitor::monitor::{FpsMonitor, Host};
//! use fps_monitor::traits::{EventKind, HostEvent};
//!
//! let bus = Arc::new(EventBus::new());
//! let host = Host {
//!     events: bus.clone(),
//!     frames: Arc::new(IntervalFrames::from_hz(60)),
//!     surface: Arc::new(SurfaceState::new()),
//! };
//! let reporter = Arc::new(JsonLinesReporter::new(std::io::stdout()));
//! let monitor = FpsMonitor::new(MonitorConfig::default(), host, Some(reporter));
//!
//! monitor.start_monitor();
//! bus.dispatch(HostEvent::new(EventKind::Scroll));
//! # }
//! ```

mod classify;
mod types;

pub use classify::{classify, low_fps_threshold};
pub use types::{ExtraData, FpsStats, MonitorPhase, Report};

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures_util::FutureExt;
use tokio::runtime::Handle;

use crate::collector::SampleCollector;
use crate::config::{validate_monitor_config, MonitorConfig};
use crate::error::{CancelReason, CollectError, ConfigError};
use crate::metrics::{IgnoreReason, MetricsSnapshot, MonitorMetrics};
use crate::refresh::SharedEstimator;
use crate::traits::{
    EventHandler, EventKind, EventSource, FrameSource, HostEvent, Reporter, Surface,
};

/// Host collaborators a monitor is wired to.
#[derive(Clone)]
pub struct Host {
    /// Interaction event source.
    pub events: Arc<dyn EventSource>,
    /// Frame-callback scheduler.
    pub frames: Arc<dyn FrameSource>,
    /// Visibility and scroll state.
    pub surface: Arc<dyn Surface>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}

/// Registered listeners.
#[derive(Debug, Default)]
struct Listeners {
    triggers: Vec<EventKind>,
    focus_loss: bool,
}

impl Listeners {
    fn is_empty(&self) -> bool {
        self.triggers.is_empty() && !self.focus_loss
    }
}

struct MonitorInner {
    config: MonitorConfig,
    events: Arc<dyn EventSource>,
    surface: Arc<dyn Surface>,
    collector: SampleCollector,
    reporter: Option<Arc<dyn Reporter>>,
    listeners: Mutex<Listeners>,
    busy: AtomicBool,
    trigger_count: AtomicU32,
    metrics: MonitorMetrics,
}

/// Clears the busy flag when the trigger task ends, however it ends.
struct BusyGuard(Arc<MonitorInner>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.busy.store(false, Ordering::Release);
    }
}

impl MonitorInner {
    fn lock_listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|poison_error| {
            tracing::warn!("Listener lock poisoned, using recovered state");
            PoisonError::into_inner(poison_error)
        })
    }

    fn start(self: &Arc<Self>) {
        let (to_arm, arm_focus_loss) = {
            let mut listeners = self.lock_listeners();
            let to_arm: Vec<EventKind> = self
                .config
                .monitor_events
                .iter()
                .copied()
                .filter(|kind| !listeners.triggers.contains(kind))
                .collect();
            listeners.triggers.extend(&to_arm);
            let arm_focus_loss = !listeners.focus_loss;
            listeners.focus_loss = true;
            (to_arm, arm_focus_loss)
        };

        for kind in &to_arm {
            self.events
                .subscribe(*kind, trigger_handler(Arc::downgrade(self)));
        }
        if arm_focus_loss {
            self.events
                .subscribe(EventKind::Blur, focus_loss_handler(Arc::downgrade(self)));
        }

        tracing::info!(events = ?to_arm, "Fps monitor started");
    }

    fn stop(&self, kinds: Option<&[EventKind]>) {
        if self.collector.cancel(CancelReason::MonitorStopped) {
            self.metrics.record_cancellation();
        }

        let (removed, remove_focus_loss) = {
            let mut listeners = self.lock_listeners();
            let removed: Vec<EventKind> = match kinds {
                Some(kinds) if !kinds.is_empty() => listeners
                    .triggers
                    .iter()
                    .copied()
                    .filter(|kind| kinds.contains(kind))
                    .collect(),
                _ => listeners.triggers.clone(),
            };
            listeners.triggers.retain(|kind| !removed.contains(kind));
            let remove_focus_loss = listeners.triggers.is_empty() && listeners.focus_loss;
            if remove_focus_loss {
                listeners.focus_loss = false;
            }
            (removed, remove_focus_loss)
        };

        for kind in &removed {
            self.events.unsubscribe(*kind);
        }
        if remove_focus_loss {
            self.events.unsubscribe(EventKind::Blur);
        }

        tracing::info!(
            events = ?removed,
            disarmed = remove_focus_loss,
            "Fps monitor stopped"
        );
    }

    fn on_trigger(self: &Arc<Self>, event: HostEvent) {
        // An event during a collection never counts against the ceiling
        if self.busy.load(Ordering::Acquire) {
            self.metrics.record_ignored(IgnoreReason::Busy);
            tracing::trace!(event = %event.kind, "Classification in progress, trigger ignored");
            return;
        }

        let ceiling = self.config.collect_max_count;
        let count = self.trigger_count.load(Ordering::Acquire);
        if ceiling > 0 && count >= ceiling {
            tracing::debug!(
                trigger_count = count,
                ceiling,
                "Trigger ceiling reached, stopping monitor"
            );
            self.stop(None);
            return;
        }

        if self.surface.is_hidden() {
            self.metrics.record_ignored(IgnoreReason::Hidden);
            tracing::trace!(event = %event.kind, "Surface hidden, trigger ignored");
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(event = %event.kind, "No async runtime on dispatching thread, trigger ignored");
            return;
        };

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.metrics.record_ignored(IgnoreReason::Busy);
            tracing::trace!(event = %event.kind, "Classification in progress, trigger ignored");
            return;
        }
        let guard = BusyGuard(Arc::clone(self));

        let trigger_count = self.trigger_count.fetch_add(1, Ordering::AcqRel) + 1;
        self.metrics.record_trigger();
        let scroll_start = self.scroll_snapshot();
        tracing::debug!(event = %event.kind, trigger_count, "Fps collection triggered");

        runtime.spawn(async move {
            let inner = Arc::clone(&guard.0);
            let outcome = AssertUnwindSafe(inner.classify_and_report(event, scroll_start))
                .catch_unwind()
                .await;
            if outcome.is_err() {
                tracing::error!(trigger_count, "Fps trigger task panicked");
            }
            drop(guard);
        });
    }

    fn on_focus_loss(&self) {
        if self.collector.cancel(CancelReason::LostFocus) {
            self.metrics.record_cancellation();
        }
    }

    async fn get_stats(&self) -> Result<FpsStats, CollectError> {
        let collection = self.collector.collect().await?;
        let rated_fps = self.collector.estimator().rated_rate();
        let threshold = low_fps_threshold(
            self.config.low_threshold,
            self.config.low_threshold_percent,
            rated_fps,
        );
        Ok(classify(
            collection,
            threshold,
            self.config.low_sample_percent,
            rated_fps,
        ))
    }

    async fn classify_and_report(&self, event: HostEvent, scroll_start: i64) {
        let stats = match self.get_stats().await {
            Ok(stats) => stats,
            Err(CollectError::Cancelled { reason }) => {
                tracing::debug!(%reason, "Fps collection cancelled, no report");
                return;
            }
            Err(error) => {
                tracing::warn!(%error, "Fps collection failed");
                return;
            }
        };

        tracing::debug!(
            is_low = stats.is_low,
            low_percent = stats.low_percent,
            rated_fps = stats.rated_fps,
            samples = stats.samples.len(),
            "Fps classified"
        );

        let Some(reporter) = &self.reporter else {
            return;
        };

        let is_low = stats.is_low;
        let report = Report {
            stats,
            event,
            extra: ExtraData {
                scroll_y: [scroll_start, self.scroll_snapshot()],
            },
        };
        match reporter.report(&report) {
            Ok(()) => self.metrics.record_report(is_low),
            Err(error) => {
                self.metrics.record_report_failure();
                tracing::warn!(%error, "Fps report failed");
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn scroll_snapshot(&self) -> i64 {
        self.surface
            .scroll_offset()
            .map_or(0, |offset| offset.round() as i64)
    }

    fn phase(&self) -> MonitorPhase {
        if self.busy.load(Ordering::Acquire) {
            MonitorPhase::Collecting
        } else if self.lock_listeners().is_empty() {
            MonitorPhase::Idle
        } else {
            MonitorPhase::Armed
        }
    }
}

fn trigger_handler(inner: Weak<MonitorInner>) -> EventHandler {
    Arc::new(move |event| {
        if let Some(inner) = inner.upgrade() {
            inner.on_trigger(event);
        }
    })
}

fn focus_loss_handler(inner: Weak<MonitorInner>) -> EventHandler {
    Arc::new(move |_| {
        if let Some(inner) = inner.upgrade() {
            inner.on_focus_loss();
        }
    })
}

/// Trigger-driven FPS monitor.
///
/// Constructed with [`FpsMonitor::new`], an invalid configuration yields an
/// inert monitor: every operation is a no-op and [`FpsMonitor::get_stats`]
/// fails with [`CollectError::Inactive`]. Dropping an armed monitor stops it.
pub struct FpsMonitor {
    inner: Option<Arc<MonitorInner>>,
}

impl std::fmt::Debug for FpsMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FpsMonitor")
            .field("active", &self.is_active())
            .field("phase", &self.phase())
            .field("trigger_count", &self.trigger_count())
            .finish_non_exhaustive()
    }
}

impl FpsMonitor {
    /// Create a monitor, degrading to an inert instance on invalid
    /// configuration.
    ///
    /// The rejection is logged at `warn`.
    #[must_use]
    pub fn new(config: MonitorConfig, host: Host, reporter: Option<Arc<dyn Reporter>>) -> Self {
        match Self::try_new(config, host, reporter) {
            Ok(monitor) => monitor,
            Err(error) => {
                tracing::warn!(%error, "Invalid fps monitor configuration, monitor is inactive");
                Self { inner: None }
            }
        }
    }

    /// Create a monitor with a fresh refresh-rate estimator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the configuration is invalid.
    pub fn try_new(
        config: MonitorConfig,
        host: Host,
        reporter: Option<Arc<dyn Reporter>>,
    ) -> Result<Self, ConfigError> {
        Self::with_estimator(config, host, reporter, SharedEstimator::new())
    }

    /// Create a monitor that shares an existing refresh-rate estimator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the configuration is invalid.
    pub fn with_estimator(
        config: MonitorConfig,
        host: Host,
        reporter: Option<Arc<dyn Reporter>>,
        estimator: SharedEstimator,
    ) -> Result<Self, ConfigError> {
        validate_monitor_config(&config)?;

        let collector = SampleCollector::new(
            host.frames,
            estimator,
            config.collect_duration,
            config.collect_interval,
        );

        Ok(Self {
            inner: Some(Arc::new(MonitorInner {
                config,
                events: host.events,
                surface: host.surface,
                collector,
                reporter,
                listeners: Mutex::new(Listeners::default()),
                busy: AtomicBool::new(false),
                trigger_count: AtomicU32::new(0),
                metrics: MonitorMetrics::new(),
            })),
        })
    }

    /// Register listeners for the configured events plus the focus-loss
    /// listener. Kinds already armed are skipped.
    pub fn start_monitor(&self) {
        match &self.inner {
            Some(inner) => inner.start(),
            None => tracing::debug!("Monitor is inactive, start ignored"),
        }
    }

    /// Cancel any in-flight collection and remove listeners.
    ///
    /// `None` or an empty slice removes every armed trigger. The focus-loss
    /// listener goes once no trigger remains armed.
    pub fn stop_monitor(&self, kinds: Option<&[EventKind]>) {
        if let Some(inner) = &self.inner {
            inner.stop(kinds);
        }
    }

    /// Collect samples (or join the in-flight collection) and classify them.
    ///
    /// # Errors
    ///
    /// Returns [`CollectError::Cancelled`] when the collection is cancelled,
    /// [`CollectError::Inactive`] on an inert monitor.
    pub async fn get_stats(&self) -> Result<FpsStats, CollectError> {
        match &self.inner {
            Some(inner) => inner.get_stats().await,
            None => Err(CollectError::Inactive),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> MonitorPhase {
        self.inner
            .as_ref()
            .map_or(MonitorPhase::Idle, |inner| inner.phase())
    }

    /// Triggers accepted so far.
    #[must_use]
    pub fn trigger_count(&self) -> u32 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.trigger_count.load(Ordering::Acquire))
    }

    /// Returns false when the configuration was rejected.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Rated refresh rate inferred so far (0 = unrated).
    #[must_use]
    pub fn rated_fps(&self) -> u32 {
        self.inner
            .as_ref()
            .map_or(0, |inner| inner.collector.estimator().current_rate())
    }

    /// Counter snapshot.
    #[must_use]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner
            .as_ref()
            .map(|inner| inner.metrics.snapshot())
            .unwrap_or_default()
    }
}

impl Drop for FpsMonitor {
    fn drop(&mut self) {
        if let Some(inner) = &self.inner {
            if inner.phase() != MonitorPhase::Idle {
                inner.stop(None);
            }
        }
    }
}
