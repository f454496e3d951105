//! Shared fixtures for the workflow tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fps_monitor::config::MonitorConfig;
use fps_monitor::host::{EventBus, IntervalFrames, JsonLinesReporter, SurfaceState};
use fps_monitor::monitor::{FpsMonitor, Host, Report};
use fps_monitor::traits::{EventKind, FrameSource, HostEvent};
use tokio::time::Instant;

/// Writer that appends to a shared buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Reports written so far, one per line.
    pub fn reports(&self) -> Vec<Report> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A monitor wired to a simulated host.
pub struct Harness {
    pub bus: Arc<EventBus>,
    pub surface: Arc<SurfaceState>,
    pub output: SharedBuffer,
    pub monitor: FpsMonitor,
}

impl Harness {
    /// Build an armed monitor with the given frame source.
    pub fn armed(config: MonitorConfig, frames: Arc<dyn FrameSource>) -> Self {
        let harness = Self::new(config, frames);
        harness.monitor.start_monitor();
        harness
    }

    /// Build an unarmed monitor with the given frame source.
    pub fn new(config: MonitorConfig, frames: Arc<dyn FrameSource>) -> Self {
        let bus = Arc::new(EventBus::new());
        let surface = Arc::new(SurfaceState::new());
        let output = SharedBuffer::default();
        let host = Host {
            events: bus.clone(),
            frames,
            surface: surface.clone(),
        };
        let reporter = Arc::new(JsonLinesReporter::new(output.clone()));
        let monitor = FpsMonitor::new(config, host, Some(reporter));
        Self {
            bus,
            surface,
            output,
            monitor,
        }
    }

    /// Dispatch an event of `kind`. Returns true if a listener received it.
    pub fn fire(&self, kind: EventKind) -> bool {
        self.bus.dispatch(HostEvent::new(kind))
    }
}

/// Frame source at `hz`.
pub fn frames_at(hz: u32) -> Arc<dyn FrameSource> {
    Arc::new(IntervalFrames::from_hz(hz))
}

/// Frame source that never produces a frame, like a stalled compositor.
struct StalledFrames;

#[async_trait]
impl FrameSource for StalledFrames {
    async fn next_frame(&self) -> Instant {
        std::future::pending().await
    }
}

/// Frame source that never produces a frame.
pub fn no_frames() -> Arc<dyn FrameSource> {
    Arc::new(StalledFrames)
}

/// Config with a `window_ms` window split into `interval_ms` periods.
pub fn config(window_ms: u64, interval_ms: u64) -> MonitorConfig {
    MonitorConfig {
        collect_duration: Duration::from_millis(window_ms),
        collect_interval: Duration::from_millis(interval_ms),
        ..MonitorConfig::default()
    }
}

/// Advance the paused clock by `ms`.
pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
