//! Reconciliation ticks and the background poll loop.

mod common;

use bridge_traits::transport::TransportOperation;
use common::{four_tracks, manual_store, Call, FakeTransport};
use core_playback::{Dispatch, PlayerStore, TickOutcome, Track};
use core_runtime::config::PlayerConfig;
use core_runtime::events::PlayerEvent;
use std::time::Duration;

// ============================================================================
// Single ticks
// ============================================================================

#[tokio::test]
async fn test_first_progress_clears_buffering() {
    let (store, transport) = manual_store();

    store.set_queue_and_play(four_tracks(), 0).await;
    assert!(store.snapshot().is_buffering);

    transport.set_position(0.5);
    let outcome = store.poll_once().await;

    assert_eq!(
        outcome,
        TickOutcome::Reconciled {
            position: 0.5,
            buffering_cleared: true
        }
    );
    let snap = store.snapshot();
    assert!(snap.is_playing);
    assert!(!snap.is_buffering);
    assert_eq!(snap.position, 0.5);
}

#[tokio::test]
async fn test_progress_within_epsilon_keeps_buffering() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;
    store.seek_to_seconds(10.0).await;

    transport.set_position(10.03);
    store.poll_once().await;
    let snap = store.snapshot();
    assert!(snap.is_buffering);
    assert_eq!(snap.position, 10.03);

    transport.set_position(10.09);
    let outcome = store.poll_once().await;
    assert!(matches!(
        outcome,
        TickOutcome::Reconciled {
            buffering_cleared: true,
            ..
        }
    ));
    assert!(!store.snapshot().is_buffering);
}

#[tokio::test]
async fn test_buffering_clear_is_published() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;
    let mut events = store.events().subscribe();

    transport.set_position(1.0);
    store.poll_once().await;

    assert_eq!(
        events.try_recv().ok(),
        Some(PlayerEvent::BufferingChanged { buffering: false })
    );
}

#[tokio::test]
async fn test_paused_store_does_not_query() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;
    store.pause().await;
    transport.clear_calls();

    assert_eq!(store.poll_once().await, TickOutcome::Skipped);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_empty_store_does_not_query() {
    let (store, transport) = manual_store();

    assert_eq!(store.poll_once().await, TickOutcome::Skipped);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_failed_query_keeps_state_and_recovers() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;
    transport.set_position(3.0);
    store.poll_once().await;

    transport.fail(TransportOperation::GetPosition);
    transport.set_position(4.0);
    let before = store.snapshot();

    assert_eq!(
        store.poll_once().await,
        TickOutcome::TransportFailed {
            operation: TransportOperation::GetPosition
        }
    );
    assert_eq!(store.snapshot(), before);

    transport.recover(TransportOperation::GetPosition);
    store.poll_once().await;
    assert_eq!(store.snapshot().position, 4.0);
}

#[tokio::test]
async fn test_non_finite_position_is_ignored() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;
    transport.set_position(f64::NAN);

    assert_eq!(
        store.poll_once().await,
        TickOutcome::TransportFailed {
            operation: TransportOperation::GetPosition
        }
    );
    assert_eq!(store.snapshot().position, 0.0);
}

#[tokio::test]
async fn test_duration_is_fetched_once_after_track_load() {
    let (store, transport) = manual_store();
    store
        .set_queue_and_play(vec![Track::new("/music/unknown.ogg", "U", "V")], 0)
        .await;
    assert_eq!(store.snapshot().duration, 240.0);

    transport.set_duration(300.0);
    transport.set_position(1.0);
    store.poll_once().await;
    store.poll_once().await;

    assert_eq!(store.snapshot().duration, 300.0);
    assert_eq!(transport.count(&Call::GetDuration), 1);
    assert_eq!(transport.count(&Call::GetPosition), 2);
}

#[tokio::test]
async fn test_unreported_duration_is_retried() {
    let (store, transport) = manual_store();
    store
        .set_queue_and_play(vec![Track::new("/music/unknown.ogg", "U", "V")], 0)
        .await;

    store.poll_once().await;
    transport.set_duration(180.0);
    store.poll_once().await;

    assert_eq!(transport.count(&Call::GetDuration), 2);
    assert_eq!(store.snapshot().duration, 180.0);
}

#[tokio::test]
async fn test_finished_track_advances_queue() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 3).await;
    transport.clear_calls();

    transport.set_position(198.0);
    let outcome = store.poll_once().await;

    assert_eq!(outcome, TickOutcome::Advanced(Dispatch::Applied));
    let snap = store.snapshot();
    assert_eq!(snap.queue_index, Some(0));
    assert_eq!(snap.position, 0.0);
    assert!(snap.is_playing);
    assert!(matches!(
        transport.commands().as_slice(),
        [Call::PlaySelection { start_index: 0, .. }]
    ));
}

#[tokio::test]
async fn test_estimated_duration_never_auto_advances() {
    let (store, transport) = manual_store();
    store
        .set_queue_and_play(vec![Track::new("/music/long.ogg", "L", "M")], 0)
        .await;

    transport.set_position(400.0);
    let outcome = store.poll_once().await;

    assert!(matches!(outcome, TickOutcome::Reconciled { .. }));
    let snap = store.snapshot();
    assert_eq!(snap.position, 240.0);
    assert!(snap.position <= snap.duration);
}

// ============================================================================
// Responses arriving late
// ============================================================================

#[tokio::test]
async fn test_drag_started_during_query_wins() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;
    transport.set_position(2.0);
    store.poll_once().await;

    let release = transport.gate_next_position();
    let ticking = store.clone();
    let tick = tokio::spawn(async move { ticking.poll_once().await });
    while transport.count(&Call::GetPosition) < 2 {
        tokio::task::yield_now().await;
    }

    store.begin_drag();
    store.drag_to_seconds(150.0);
    release.send(90.0).ok();

    assert_eq!(tick.await.unwrap(), TickOutcome::Skipped);
    let snap = store.snapshot();
    assert_eq!(snap.position, 2.0);
    assert_eq!(snap.display_position(), 150.0);

    store.commit_drag().await;
    assert_eq!(store.snapshot().position, 150.0);
}

#[tokio::test]
async fn test_reading_for_previous_track_is_discarded() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;

    let release = transport.gate_next_position();
    let ticking = store.clone();
    let tick = tokio::spawn(async move { ticking.poll_once().await });
    while transport.count(&Call::GetPosition) < 1 {
        tokio::task::yield_now().await;
    }

    store.next().await;
    release.send(211.0).ok();

    assert_eq!(tick.await.unwrap(), TickOutcome::Skipped);
    let snap = store.snapshot();
    assert_eq!(snap.queue_index, Some(1));
    assert_eq!(snap.position, 0.0);
    assert!(snap.is_buffering);
}

#[tokio::test]
async fn test_ticks_wait_for_pending_selection() {
    let (store, transport) = manual_store();
    store.set_queue_and_play(four_tracks(), 0).await;

    let release = transport.gate_next_selection();
    let advancing = store.clone();
    let next = tokio::spawn(async move { advancing.next().await });
    while transport.selections() < 2 {
        tokio::task::yield_now().await;
    }

    transport.set_position(3.0);
    assert_eq!(store.poll_once().await, TickOutcome::Skipped);
    assert_eq!(transport.count(&Call::GetPosition), 0);

    release.send(()).ok();
    assert_eq!(next.await.unwrap(), Dispatch::Applied);
    assert_eq!(
        store.poll_once().await,
        TickOutcome::Reconciled {
            position: 3.0,
            buffering_cleared: true
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_selection_does_not_block_ticks() {
    let (store, transport) = manual_store();
    let _held = transport.gate_next_selection();

    let started = tokio::time::timeout(
        Duration::from_millis(100),
        store.set_queue_and_play(four_tracks(), 0),
    )
    .await;
    assert!(started.is_err());

    store.play().await;
    transport.set_position(2.0);
    assert_eq!(
        store.poll_once().await,
        TickOutcome::Reconciled {
            position: 2.0,
            buffering_cleared: true
        }
    );
}

// ============================================================================
// Background loop
// ============================================================================

fn polling_store() -> (PlayerStore, std::sync::Arc<FakeTransport>) {
    let transport = FakeTransport::new();
    let store = PlayerStore::new(transport.clone(), PlayerConfig::default()).expect("valid config");
    (store, transport)
}

#[tokio::test(start_paused = true)]
async fn test_playback_starts_the_poll_loop() {
    let (store, transport) = polling_store();
    assert!(!store.is_polling());

    store.set_queue_and_play(four_tracks(), 0).await;
    assert!(store.is_polling());

    transport.set_position(0.75);
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(transport.count(&Call::GetPosition), 1);
    let snap = store.snapshot();
    assert_eq!(snap.position, 0.75);
    assert!(!snap.is_buffering);
}

#[tokio::test(start_paused = true)]
async fn test_restarting_keeps_a_single_loop() {
    let (store, transport) = polling_store();
    store.set_queue_and_play(four_tracks(), 0).await;

    assert!(store.start_polling());
    assert!(store.start_polling());
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert_eq!(transport.count(&Call::GetPosition), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_polling_halts_queries() {
    let (store, transport) = polling_store();
    store.set_queue_and_play(four_tracks(), 0).await;

    store.stop_polling();
    assert!(!store.is_polling());
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(transport.count(&Call::GetPosition), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_ends_the_loop() {
    let (store, transport) = polling_store();
    store.set_queue_and_play(four_tracks(), 0).await;

    store.stop().await;
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(!store.is_polling());
    assert_eq!(transport.count(&Call::GetPosition), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_the_store_ends_the_loop() {
    let (store, transport) = polling_store();
    store.set_queue_and_play(four_tracks(), 0).await;

    drop(store);
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert_eq!(transport.count(&Call::GetPosition), 0);
}

#[tokio::test(start_paused = true)]
async fn test_loop_keeps_polling_through_failures() {
    let (store, transport) = polling_store();
    store.set_queue_and_play(four_tracks(), 0).await;
    transport.fail(TransportOperation::GetPosition);

    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(transport.count(&Call::GetPosition) >= 3);
    assert!(store.is_polling());

    transport.recover(TransportOperation::GetPosition);
    transport.set_position(1.0);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(store.snapshot().position, 1.0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_during_auto_advance_leaves_loop_usable() {
    let (store, transport) = polling_store();
    store.set_queue_and_play(four_tracks(), 3).await;

    let release = transport.gate_next_selection();
    transport.set_position(198.0);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(transport.selections(), 2);

    store.stop().await;
    assert!(!store.is_polling());
    release.send(()).ok();
    tokio::task::yield_now().await;

    transport.set_position(5.0);
    store.play().await;
    assert!(store.is_polling());
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snap = store.snapshot();
    assert_eq!(snap.queue_index, Some(0));
    assert!(snap.is_playing);
    assert!(!snap.is_buffering);
    assert_eq!(snap.position, 5.0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_during_auto_advance_finishes_the_advance() {
    let (store, transport) = polling_store();
    store.set_queue_and_play(four_tracks(), 3).await;

    let release = transport.gate_next_selection();
    transport.set_position(198.0);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(transport.selections(), 2);

    assert!(store.start_polling());
    release.send(()).ok();
    transport.set_position(1.5);
    tokio::time::sleep(Duration::from_millis(300)).await;

    let snap = store.snapshot();
    assert_eq!(snap.queue_index, Some(0));
    assert_eq!(snap.position, 1.5);
    assert!(!snap.is_buffering);
}

#[test]
fn test_start_polling_outside_runtime_reports_false() {
    let transport = FakeTransport::new();
    let store = PlayerStore::new(transport, PlayerConfig::default()).expect("valid config");

    assert!(!store.start_polling());
    assert!(!store.is_polling());
}
