use std::time::Duration;

use tokio::{
    sync::watch,
    time::{sleep, timeout, Instant},
};

use super::*;
use crate::{
    services::{
        testing::{self, PeripheralEvent, EventLog},
        StatusNotification,
    },
    state::{CountdownState, Phase, SettingsUpdate},
};

fn spawn_recording() -> (EngineHandle, EventLog) {
    let (peripherals, log) = testing::recording();
    let (handle, _task) = CountdownEngine::spawn(EngineConfig::default(), peripherals);
    (handle, log)
}

async fn wait_finished(rx: &mut watch::Receiver<CountdownState>) -> CountdownState {
    timeout(Duration::from_secs(24 * 3600), rx.wait_for(|s| s.is_finished))
        .await
        .expect("countdown never finished")
        .expect("engine dropped its state")
        .clone()
}

/// Let the notification task catch up with the engine
async fn settle() {
    sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn every_duration_reaches_zero_and_finishes() {
    let (handle, _log) = spawn_recording();

    for seconds in [1, 2, 5, 37, 61] {
        let started = Instant::now();
        assert!(handle.start(seconds, false, false).await.unwrap());

        // Subscribe after the restart so the previous run's finish is not seen
        let mut rx = handle.subscribe();
        let state = wait_finished(&mut rx).await;
        assert_eq!(state.remaining_seconds, 0);
        assert!(state.is_finished);
        assert_eq!(state.phase, Phase::Finished);
        assert_eq!(state.total_seconds, seconds);

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(seconds));
        assert!(elapsed < Duration::from_secs(seconds + 1));
    }
}

#[tokio::test(start_paused = true)]
async fn remaining_never_increases_within_a_run() {
    let (handle, _log) = spawn_recording();
    let mut rx = handle.subscribe();
    handle.start(10, false, false).await.unwrap();

    let mut seen = vec![rx.borrow_and_update().remaining_seconds];
    while !rx.borrow().is_finished {
        rx.changed().await.unwrap();
        seen.push(rx.borrow_and_update().remaining_seconds);
    }

    assert_eq!(seen.first(), Some(&10));
    assert_eq!(seen.last(), Some(&0));
    assert!(seen.windows(2).all(|pair| pair[0] >= pair[1]), "{:?}", seen);
}

#[tokio::test(start_paused = true)]
async fn stop_after_three_ticks_freezes_the_count() {
    let (handle, log) = spawn_recording();
    handle.start(10, true, true).await.unwrap();

    sleep(Duration::from_millis(3500)).await;
    handle.stop().await.unwrap();

    let state = handle.snapshot();
    assert_eq!(state.remaining_seconds, 7);
    assert_eq!(state.phase, Phase::Idle);
    assert!(!state.is_finished);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(handle.snapshot().remaining_seconds, 7);
    assert_eq!(log.count(&PeripheralEvent::Vibrated), 0);
    assert_eq!(log.count(&PeripheralEvent::AlarmPlayed), 0);
    assert_eq!(log.count(&PeripheralEvent::WakeLockReleased), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_at_any_tick_halts_decrements() {
    let (handle, _log) = spawn_recording();

    for ticks in 0..5u64 {
        handle.start(5, false, false).await.unwrap();
        sleep(Duration::from_millis(ticks * 1000 + 500)).await;
        handle.stop().await.unwrap();

        let frozen = handle.snapshot().remaining_seconds;
        assert_eq!(frozen, 5 - ticks);

        sleep(Duration::from_secs(10)).await;
        let state = handle.snapshot();
        assert_eq!(state.remaining_seconds, frozen);
        assert!(!state.is_finished);
    }
}

#[tokio::test(start_paused = true)]
async fn start_while_running_restarts_instead_of_resuming() {
    let (handle, log) = spawn_recording();
    handle.start(10, false, false).await.unwrap();
    sleep(Duration::from_millis(2500)).await;
    assert_eq!(handle.snapshot().remaining_seconds, 8);

    let restarted = Instant::now();
    assert!(handle.start(3, false, false).await.unwrap());
    let state = handle.snapshot();
    assert_eq!(state.remaining_seconds, 3);
    assert_eq!(state.run_id, 2);

    let mut rx = handle.subscribe();
    let mut seen = vec![];
    while !rx.borrow().is_finished {
        rx.changed().await.unwrap();
        seen.push(rx.borrow_and_update().remaining_seconds);
    }
    assert!(seen.iter().all(|&remaining| remaining <= 3), "{:?}", seen);
    assert!(restarted.elapsed() < Duration::from_secs(4));

    // One wake lock per run, the first released before the second is taken
    assert_eq!(
        log.wake_lock_timeouts(),
        vec![Duration::from_secs(70), Duration::from_secs(63)]
    );
    assert_eq!(log.count(&PeripheralEvent::WakeLockReleased), 1);
}

#[tokio::test(start_paused = true)]
async fn restart_after_finish_resets_finished_flag_and_silences_alarm() {
    let (handle, log) = spawn_recording();
    let mut rx = handle.subscribe();
    handle.start(2, true, true).await.unwrap();
    wait_finished(&mut rx).await;

    handle.start(4, true, true).await.unwrap();
    let state = handle.snapshot();
    assert!(!state.is_finished);
    assert_eq!(state.phase, Phase::Running);
    assert_eq!(log.count(&PeripheralEvent::AlarmStopped), 1);
    assert_eq!(log.count(&PeripheralEvent::VibrationCancelled), 1);
}

#[tokio::test(start_paused = true)]
async fn update_settings_keeps_count_and_applies_at_expiry() {
    let (handle, log) = spawn_recording();
    let mut rx = handle.subscribe();
    handle.start(10, false, true).await.unwrap();
    sleep(Duration::from_millis(4500)).await;

    let state = handle
        .update_settings(SettingsUpdate {
            vibration: Some(true),
            alarm: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(state.remaining_seconds, 6);
    assert!(state.vibration_enabled);
    assert!(!state.alarm_sound_enabled);
    assert_eq!(state.phase, Phase::Running);

    wait_finished(&mut rx).await;
    assert_eq!(log.count(&PeripheralEvent::Vibrated), 1);
    assert_eq!(log.count(&PeripheralEvent::AlarmPlayed), 0);
}

#[tokio::test(start_paused = true)]
async fn empty_settings_update_changes_nothing() {
    let (handle, _log) = spawn_recording();
    handle.start(10, true, false).await.unwrap();
    let before = handle.snapshot();

    let after = handle.update_settings(SettingsUpdate::default()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test(start_paused = true)]
async fn disabling_alarm_while_ringing_silences_it() {
    let (handle, log) = spawn_recording();
    let mut rx = handle.subscribe();
    handle.start(1, true, true).await.unwrap();
    wait_finished(&mut rx).await;

    handle
        .update_settings(SettingsUpdate {
            vibration: None,
            alarm: Some(false),
        })
        .await
        .unwrap();
    assert_eq!(log.count(&PeripheralEvent::AlarmStopped), 1);
    assert_eq!(log.count(&PeripheralEvent::VibrationCancelled), 0);
    assert!(handle.snapshot().is_finished);
}

#[tokio::test(start_paused = true)]
async fn failing_peripherals_do_not_stop_the_countdown() {
    let (peripherals, log) = testing::failing();
    let (handle, _task) = CountdownEngine::spawn(EngineConfig::default(), peripherals);
    let mut rx = handle.subscribe();

    assert!(handle.start(5, true, true).await.unwrap());
    let state = wait_finished(&mut rx).await;
    assert_eq!(state.remaining_seconds, 0);

    // Alerts were still attempted
    assert_eq!(log.count(&PeripheralEvent::Vibrated), 1);
    assert_eq!(log.count(&PeripheralEvent::AlarmPlayed), 1);
    assert_eq!(log.wake_lock_timeouts().len(), 1);

    // The first post failed, so the plain fallback was tried
    settle().await;
    let shown = log.shown();
    assert_eq!(shown[0], StatusNotification::running(5));
    assert_eq!(shown[1], StatusNotification::simple());
}

fn within(elapsed: Duration, expected: Duration) -> bool {
    elapsed >= expected && elapsed < expected + Duration::from_millis(100)
}

#[tokio::test(start_paused = true)]
async fn hanging_peripherals_only_delay_by_their_timeout() {
    let (peripherals, log) = testing::hanging();
    let config = EngineConfig::default();
    let limit = config.peripheral_timeout;
    let (handle, _task) = CountdownEngine::spawn(config, peripherals);
    let mut rx = handle.subscribe();

    // The wake lock never answers, so the reply waits out one timeout
    let started = Instant::now();
    assert!(handle.start(3, true, true).await.unwrap());
    assert!(within(started.elapsed(), limit));

    // Missed ticks catch up with the start time, then vibration and alarm
    // each wait out their own timeout before the finish is published
    let state = wait_finished(&mut rx).await;
    assert_eq!(state.remaining_seconds, 0);
    assert!(within(started.elapsed(), limit * 3));
    assert_eq!(log.count(&PeripheralEvent::Vibrated), 1);
    assert_eq!(log.count(&PeripheralEvent::AlarmPlayed), 1);

    // Stop waits on vibration cancel and alarm stop, and still completes
    let stopping = Instant::now();
    handle.stop().await.unwrap();
    assert!(within(stopping.elapsed(), limit * 2));
    assert_eq!(handle.snapshot().phase, Phase::Idle);
    assert_eq!(log.count(&PeripheralEvent::WakeLockReleased), 0);
}

#[tokio::test(start_paused = true)]
async fn five_second_run_dispatches_each_alert_once() {
    let (handle, log) = spawn_recording();
    let mut rx = handle.subscribe();
    handle.start(5, true, true).await.unwrap();

    let state = wait_finished(&mut rx).await;
    assert_eq!(state.remaining_seconds, 0);
    assert!(state.is_finished);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(log.count(&PeripheralEvent::Vibrated), 1);
    assert_eq!(log.count(&PeripheralEvent::AlarmPlayed), 1);
    assert_eq!(log.wake_lock_timeouts(), vec![Duration::from_secs(65)]);
    assert_eq!(log.shown().last(), Some(&StatusNotification::finished()));

    handle.stop().await.unwrap();
    assert_eq!(log.count(&PeripheralEvent::VibrationCancelled), 1);
    assert_eq!(log.count(&PeripheralEvent::AlarmStopped), 1);
    assert_eq!(log.count(&PeripheralEvent::WakeLockReleased), 1);

    // The notification is left for the caller to dismiss
    settle().await;
    assert_eq!(log.count(&PeripheralEvent::Dismissed), 0);
    let state = handle.snapshot();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.remaining_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn notification_tracks_each_tick() {
    let (handle, log) = spawn_recording();
    handle.start(3, false, false).await.unwrap();
    sleep(Duration::from_millis(3500)).await;

    assert_eq!(
        log.shown(),
        vec![
            StatusNotification::running(3),
            StatusNotification::running(2),
            StatusNotification::running(1),
            StatusNotification::finished(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn zero_duration_is_ignored() {
    let (handle, log) = spawn_recording();
    assert!(!handle.start(0, true, true).await.unwrap());

    sleep(Duration::from_secs(5)).await;
    let state = handle.snapshot();
    assert_eq!(state.phase, Phase::Idle);
    assert!(!state.is_finished);
    assert_eq!(state.run_id, 0);
    assert!(log.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_duration_does_not_disturb_a_running_countdown() {
    let (handle, _log) = spawn_recording();
    handle.start(10, false, false).await.unwrap();
    sleep(Duration::from_millis(1500)).await;

    assert!(!handle.start(0, false, false).await.unwrap());
    let state = handle.snapshot();
    assert_eq!(state.phase, Phase::Running);
    assert_eq!(state.remaining_seconds, 9);
}

#[tokio::test(start_paused = true)]
async fn stop_when_idle_is_a_no_op() {
    let (handle, log) = spawn_recording();
    handle.stop().await.unwrap();
    handle.stop().await.unwrap();

    assert_eq!(handle.snapshot(), CountdownState::new());
    assert!(log.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn shutdown_dismisses_notification_and_closes_engine() {
    let (peripherals, log) = testing::recording();
    let (handle, task) = CountdownEngine::spawn(EngineConfig::default(), peripherals);
    handle.start(30, false, false).await.unwrap();
    sleep(Duration::from_millis(1500)).await;

    handle.shutdown().await.unwrap();
    task.await.unwrap();

    assert_eq!(log.events().last(), Some(&PeripheralEvent::Dismissed));
    assert_eq!(log.count(&PeripheralEvent::WakeLockReleased), 1);
    assert!(handle.is_closed());
    assert_eq!(handle.start(5, false, false).await, Err(EngineError::Closed));
    assert!(handle.shutdown().await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_ends_the_engine() {
    let (peripherals, log) = testing::recording();
    let (handle, task) = CountdownEngine::spawn(EngineConfig::default(), peripherals);
    handle.start(30, false, false).await.unwrap();

    drop(handle);
    timeout(Duration::from_secs(60), task).await.unwrap().unwrap();
    assert_eq!(log.events().last(), Some(&PeripheralEvent::Dismissed));
}

#[tokio::test(start_paused = true)]
async fn observers_attach_and_detach() {
    let (handle, _log) = spawn_recording();
    assert_eq!(handle.observer_count(), 0);

    let first = handle.subscribe();
    let second = handle.subscribe();
    assert_eq!(handle.observer_count(), 2);

    drop(first);
    assert_eq!(handle.observer_count(), 1);
    drop(second);
    assert_eq!(handle.observer_count(), 0);
}
