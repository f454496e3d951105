//! Cancellation tests.
//!
//! Tests focus loss, explicit stop and drop while a collection is in flight.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use fps_monitor::error::{CancelReason, CollectError};
use fps_monitor::monitor::MonitorPhase;
use fps_monitor::traits::EventKind;
use pretty_assertions::assert_eq;

use super::harness::{advance, config, frames_at, Harness};

#[tokio::test(start_paused = true)]
async fn test_focus_loss_drops_report() {
    let h = Harness::armed(config(5000, 1000), frames_at(60));

    h.fire(EventKind::Scroll);
    advance(500).await;
    assert_eq!(h.monitor.phase(), MonitorPhase::Collecting);

    assert!(h.fire(EventKind::Blur));
    advance(5000).await;

    assert!(h.output.reports().is_empty());
    assert_eq!(h.monitor.metrics().cancellations, 1);
    assert_eq!(h.monitor.phase(), MonitorPhase::Armed);
}

#[tokio::test(start_paused = true)]
async fn test_focus_loss_rejects_direct_get_stats() {
    let h = Arc::new(Harness::armed(config(5000, 1000), frames_at(60)));

    let pending = {
        let h = Arc::clone(&h);
        tokio::spawn(async move { h.monitor.get_stats().await })
    };
    advance(500).await;
    h.fire(EventKind::Blur);

    let result = pending.await.unwrap();
    assert_eq!(
        result,
        Err(CollectError::Cancelled {
            reason: CancelReason::LostFocus
        })
    );
    assert_eq!(
        result.unwrap_err().to_string(),
        "Collection cancelled: window lost focus, fps collection stopped"
    );
}

#[tokio::test(start_paused = true)]
async fn test_blur_while_idle_is_harmless() {
    let h = Harness::armed(config(500, 250), frames_at(60));

    assert!(h.fire(EventKind::Blur));
    h.fire(EventKind::Click);
    advance(600).await;

    assert_eq!(h.output.reports().len(), 1);
    assert_eq!(h.monitor.metrics().cancellations, 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_collection() {
    let h = Harness::armed(config(2000, 500), frames_at(60));

    h.fire(EventKind::Focus);
    advance(700).await;
    h.monitor.stop_monitor(None);
    advance(2000).await;

    assert!(h.output.reports().is_empty());
    assert_eq!(h.monitor.metrics().cancellations, 1);
    assert_eq!(h.monitor.phase(), MonitorPhase::Idle);
    assert!(h.bus.subscribed().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_partial_stop_still_cancels() {
    let h = Harness::armed(config(2000, 500), frames_at(60));

    h.fire(EventKind::Click);
    advance(300).await;
    h.monitor.stop_monitor(Some(&[EventKind::Scroll]));
    advance(2000).await;

    assert!(h.output.reports().is_empty());
    assert!(!h.bus.is_subscribed(EventKind::Scroll));
    assert!(h.bus.is_subscribed(EventKind::Click));
    assert!(h.bus.is_subscribed(EventKind::Blur));
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels_and_disarms() {
    let h = Harness::armed(config(2000, 500), frames_at(60));
    let Harness {
        bus,
        output,
        monitor,
        ..
    } = h;

    bus.dispatch(fps_monitor::traits::HostEvent::new(EventKind::Scroll));
    advance(300).await;
    drop(monitor);
    advance(2000).await;

    assert!(output.reports().is_empty());
    assert!(bus.subscribed().is_empty());
}
