//! Trigger workflow tests.
//!
//! Tests the arm → trigger → collect → report cycle.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fps_monitor::monitor::MonitorPhase;
use fps_monitor::traits::EventKind;
use pretty_assertions::assert_eq;

use super::harness::{advance, config, frames_at, no_frames, Harness};

#[tokio::test(start_paused = true)]
async fn test_quick_triggers_produce_one_report() {
    let h = Harness::armed(config(1000, 250), frames_at(60));

    assert!(h.fire(EventKind::Scroll));
    assert!(h.fire(EventKind::Scroll));
    assert!(h.fire(EventKind::Click));
    advance(1100).await;

    let reports = h.output.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].event.kind, EventKind::Scroll);
    assert_eq!(h.monitor.trigger_count(), 1);

    let metrics = h.monitor.metrics();
    assert_eq!(metrics.triggers, 1);
    assert_eq!(metrics.ignored_busy, 2);
    assert_eq!(metrics.reports, 1);
}

#[tokio::test(start_paused = true)]
async fn test_sequential_triggers_each_report() {
    let h = Harness::armed(config(1000, 250), frames_at(60));

    h.fire(EventKind::DomContentLoaded);
    advance(1100).await;
    h.fire(EventKind::Focus);
    advance(1100).await;

    let reports = h.output.reports();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].event.kind, EventKind::DomContentLoaded);
    assert_eq!(reports[1].event.kind, EventKind::Focus);
    assert!(reports.iter().all(|report| !report.stats.is_low));
    assert_eq!(h.monitor.trigger_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_trigger_ceiling_stops_monitor() {
    let mut cfg = config(500, 250);
    cfg.collect_max_count = 2;
    let h = Harness::armed(cfg, no_frames());

    h.fire(EventKind::Click);
    advance(600).await;
    h.fire(EventKind::Click);
    advance(600).await;
    assert_eq!(h.output.reports().len(), 2);
    assert_eq!(h.monitor.phase(), MonitorPhase::Armed);

    // Third trigger hits the ceiling: no collection, listeners removed
    assert!(h.fire(EventKind::Click));
    assert_eq!(h.monitor.phase(), MonitorPhase::Idle);
    advance(600).await;

    assert_eq!(h.output.reports().len(), 2);
    assert_eq!(h.monitor.trigger_count(), 2);
    assert!(h.bus.subscribed().is_empty());
    assert!(!h.fire(EventKind::Click));
}

#[tokio::test(start_paused = true)]
async fn test_event_during_last_allowed_collection_is_busy() {
    let mut cfg = config(1000, 250);
    cfg.collect_max_count = 1;
    let h = Harness::armed(cfg, frames_at(60));

    assert!(h.fire(EventKind::Scroll));
    advance(300).await;
    assert!(h.fire(EventKind::Scroll));
    assert_eq!(h.monitor.phase(), MonitorPhase::Collecting);
    advance(800).await;

    let reports = h.output.reports();
    assert_eq!(reports.len(), 1);
    assert!(!reports[0].stats.is_low);
    let metrics = h.monitor.metrics();
    assert_eq!(metrics.cancellations, 0);
    assert_eq!(metrics.ignored_busy, 1);
    assert_eq!(h.monitor.trigger_count(), 1);
    assert_eq!(h.monitor.phase(), MonitorPhase::Armed);

    // The next event after the collection settles hits the ceiling
    assert!(h.fire(EventKind::Scroll));
    assert_eq!(h.monitor.phase(), MonitorPhase::Idle);
    advance(1100).await;
    assert_eq!(h.output.reports().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hidden_surface_is_ignored() {
    let h = Harness::armed(config(500, 250), frames_at(60));

    h.surface.set_hidden(true);
    h.fire(EventKind::Scroll);
    advance(600).await;
    assert!(h.output.reports().is_empty());
    assert_eq!(h.monitor.metrics().ignored_hidden, 1);

    h.surface.set_hidden(false);
    h.fire(EventKind::Scroll);
    advance(600).await;
    assert_eq!(h.output.reports().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_scroll_offsets_bracket_collection() {
    let h = Harness::armed(config(500, 250), frames_at(60));

    h.surface.set_scroll_offset(Some(10.5));
    h.fire(EventKind::Scroll);
    h.surface.set_scroll_offset(Some(880.49));
    advance(600).await;

    let reports = h.output.reports();
    assert_eq!(reports[0].extra.scroll_y, [11, 880]);
}

#[tokio::test(start_paused = true)]
async fn test_unconfigured_events_do_not_trigger() {
    let mut cfg = config(500, 250);
    cfg.monitor_events = vec![EventKind::Click];
    let h = Harness::armed(cfg, frames_at(60));

    assert!(!h.fire(EventKind::Scroll));
    assert!(h.fire(EventKind::Click));
    advance(600).await;

    assert_eq!(h.output.reports().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_rearm_after_stop() {
    let h = Harness::armed(config(500, 250), frames_at(60));
    h.monitor.stop_monitor(None);
    assert!(!h.fire(EventKind::Scroll));

    h.monitor.start_monitor();
    assert_eq!(h.monitor.phase(), MonitorPhase::Armed);
    assert!(h.fire(EventKind::Scroll));
    advance(600).await;
    assert_eq!(h.output.reports().len(), 1);
}
