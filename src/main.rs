//! FPS Monitor binary entry point.
//!
//! Runs the monitor against a simulated host: a timer-driven frame source,
//! an event bus fed from stdin, and a JSON-lines reporter on stdout.
//! All logs go to stderr; stdout is reserved for reports.
//!
//! Each stdin line is one command:
//! - an event kind (`DOMContentLoaded`, `scroll`, `click`, `focus`, `blur`)
//!   dispatches that event
//! - `hide` / `show` toggle surface visibility
//! - `scroll <y>` sets the scroll offset, then dispatches a scroll event
//! - `stop [kind ...]` stops the monitor, `start` re-arms it
//! - `stats` writes the counters to stderr
//! - `quit` exits

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use fps_monitor::config::Config;
use fps_monitor::host::{EventBus, IntervalFrames, JsonLinesReporter, SurfaceState};
use fps_monitor::monitor::{FpsMonitor, Host};
use fps_monitor::traits::{EventKind, HostEvent};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    // Initialize logging to stderr only (stdout is for reports)
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("fps-monitor starting...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        window_ms = config.monitor.collect_duration.as_millis(),
        interval_ms = config.monitor.collect_interval.as_millis(),
        refresh_hz = config.simulated_refresh_hz,
        "Configuration loaded"
    );

    let bus = Arc::new(EventBus::new());
    let surface = Arc::new(SurfaceState::new());
    let host = Host {
        events: bus.clone(),
        frames: Arc::new(IntervalFrames::from_hz(config.simulated_refresh_hz)),
        surface: surface.clone(),
    };
    let reporter = Arc::new(JsonLinesReporter::new(std::io::stdout()));

    let monitor = match FpsMonitor::try_new(config.monitor, host, Some(reporter)) {
        Ok(monitor) => monitor,
        Err(e) => {
            tracing::error!("Monitor error: {e}");
            std::process::exit(1);
        }
    };

    monitor.start_monitor();
    bus.dispatch(HostEvent::new(EventKind::DomContentLoaded));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_command(line.trim(), &monitor, &bus, &surface) {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Input error: {e}");
                    break;
                }
            },
        }
    }

    monitor.stop_monitor(None);
    tracing::info!(metrics = ?monitor.metrics(), "fps-monitor shutdown complete");
}

/// Apply one stdin command. Returns false to exit.
#[cfg_attr(coverage_nightly, coverage(off))]
fn handle_command(line: &str, monitor: &FpsMonitor, bus: &EventBus, surface: &SurfaceState) -> bool {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return true;
    };

    match command {
        "quit" | "exit" => return false,
        "hide" => surface.set_hidden(true),
        "show" => surface.set_hidden(false),
        "start" => monitor.start_monitor(),
        "stop" => {
            let kinds: Vec<EventKind> = parts.filter_map(|part| part.parse().ok()).collect();
            monitor.stop_monitor(Some(&kinds));
        }
        "stats" => match serde_json::to_string(&monitor.metrics()) {
            Ok(json) => eprintln!("{json}"),
            Err(e) => tracing::warn!("Metrics serialization failed: {e}"),
        },
        "scroll" => {
            if let Some(offset) = parts.next() {
                match offset.parse::<f64>() {
                    Ok(offset) => surface.set_scroll_offset(Some(offset)),
                    Err(e) => {
                        tracing::warn!("Invalid scroll offset {offset:?}: {e}");
                        return true;
                    }
                }
            }
            bus.dispatch(HostEvent::new(EventKind::Scroll));
        }
        other => match other.parse::<EventKind>() {
            Ok(kind) => {
                if !bus.dispatch(HostEvent::new(kind)) {
                    tracing::debug!(event = %kind, "No listener for event");
                }
            }
            Err(e) => tracing::warn!("{e}"),
        },
    }
    true
}
