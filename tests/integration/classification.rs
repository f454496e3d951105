//! Classification tests.
//!
//! Tests verdicts for smooth, slow, high-refresh and frameless sessions.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fps_monitor::traits::EventKind;
use pretty_assertions::assert_eq;

use super::harness::{advance, config, frames_at, no_frames, Harness};

#[tokio::test(start_paused = true)]
async fn test_smooth_60hz_session() {
    let h = Harness::armed(config(5000, 1000), frames_at(60));

    h.fire(EventKind::DomContentLoaded);
    advance(5100).await;

    let reports = h.output.reports();
    assert_eq!(reports.len(), 1);
    let stats = &reports[0].stats;
    assert!(!stats.is_low);
    assert_eq!(stats.rated_fps, 60);
    // The fifth 1s period closes just after the 5s window on a 16.67ms
    // frame grid, so four samples is the usual count. The exact five-sample
    // fold is covered by collector::session::test_five_seconds_at_60hz.
    assert!((4..=5).contains(&stats.samples.len()));
    assert!(stats.samples.iter().all(|fps| (59..=61).contains(fps)));
    assert!(stats.low_samples.is_empty());
    assert_eq!(stats.low_percent, 0.0);
    assert!(stats.frame_callbacks >= 300);
    assert_eq!(h.monitor.rated_fps(), 60);
}

#[tokio::test(start_paused = true)]
async fn test_30hz_against_relative_threshold() {
    let h = Harness::armed(config(3000, 1000), frames_at(30));

    h.fire(EventKind::Click);
    advance(3100).await;

    let stats = &h.output.reports()[0].stats;
    assert_eq!(stats.rated_fps, 30);
    assert!(stats.samples.iter().all(|fps| *fps == 30));
    // 30 fps is a full frame rate on a 30 Hz display
    assert!(!stats.is_low);
}

#[tokio::test(start_paused = true)]
async fn test_30hz_against_explicit_threshold() {
    let mut cfg = config(3000, 1000);
    cfg.low_threshold = 40.0;
    let h = Harness::armed(cfg, frames_at(30));

    h.fire(EventKind::Click);
    advance(3100).await;

    let stats = &h.output.reports()[0].stats;
    assert!(stats.is_low);
    assert_eq!(stats.low_samples, stats.samples);
    assert_eq!(stats.low_percent, 1.0);
    assert_eq!(h.monitor.metrics().low_verdicts, 1);
}

#[tokio::test(start_paused = true)]
async fn test_high_refresh_display() {
    let h = Harness::armed(config(2000, 500), frames_at(144));

    h.fire(EventKind::Scroll);
    advance(2100).await;

    let stats = &h.output.reports()[0].stats;
    assert_eq!(stats.rated_fps, 144);
    assert!(stats.samples.iter().all(|fps| (143..=145).contains(fps)));
    assert!(!stats.is_low);
}

#[tokio::test(start_paused = true)]
async fn test_frameless_session_is_low() {
    let h = Harness::armed(config(1000, 500), no_frames());

    h.fire(EventKind::Focus);
    advance(1100).await;

    let stats = &h.output.reports()[0].stats;
    assert!(stats.is_low);
    assert!(stats.samples.is_empty());
    assert_eq!(stats.low_percent, 0.0);
    assert_eq!(stats.rated_fps, 0);
    assert_eq!(stats.frame_callbacks, 0);
}

#[tokio::test(start_paused = true)]
async fn test_get_stats_resolves_within_window() {
    let h = Harness::new(config(1500, 500), no_frames());
    let start = tokio::time::Instant::now();

    let stats = tokio::time::timeout(
        std::time::Duration::from_millis(1510),
        h.monitor.get_stats(),
    )
    .await
    .expect("get_stats must resolve within the window")
    .unwrap();

    assert!(stats.is_low);
    assert!(start.elapsed() >= std::time::Duration::from_millis(1500));
}

#[tokio::test(start_paused = true)]
async fn test_rated_rate_survives_sessions() {
    let h = Harness::armed(config(1000, 250), frames_at(60));

    h.fire(EventKind::Scroll);
    advance(1100).await;
    assert_eq!(h.monitor.rated_fps(), 60);

    h.fire(EventKind::Scroll);
    advance(1100).await;

    let reports = h.output.reports();
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|report| report.stats.rated_fps == 60));
}
