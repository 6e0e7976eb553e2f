//! Recording, failing and hanging peripheral doubles for tests

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{
    AlarmPlayer, Notifier, PeripheralError, PeripheralResult, Peripherals, StatusNotification,
    VibrationPattern, Vibrator, WakeLock,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeripheralEvent {
    WakeLockAcquired(Duration),
    WakeLockReleased,
    Shown(StatusNotification),
    Dismissed,
    Vibrated,
    VibrationCancelled,
    AlarmPlayed,
    AlarmStopped,
}

/// Shared log of every peripheral call, successful or not
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<PeripheralEvent>>>,
}

impl EventLog {
    fn record(&self, event: PeripheralEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<PeripheralEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: &PeripheralEvent) -> usize {
        self.events.lock().unwrap().iter().filter(|e| *e == wanted).count()
    }

    pub fn shown(&self) -> Vec<StatusNotification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PeripheralEvent::Shown(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn wake_lock_timeouts(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PeripheralEvent::WakeLockAcquired(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

/// How every call of a double completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Succeed,
    Fail,
    Hang,
}

async fn outcome(behavior: Behavior, what: &str) -> PeripheralResult {
    match behavior {
        Behavior::Succeed => Ok(()),
        Behavior::Fail => Err(PeripheralError::Unavailable(what.to_string())),
        Behavior::Hang => std::future::pending().await,
    }
}

struct TestWakeLock {
    log: EventLog,
    behavior: Behavior,
    held: bool,
}

#[async_trait]
impl WakeLock for TestWakeLock {
    async fn acquire(&mut self, timeout: Duration) -> PeripheralResult {
        self.log.record(PeripheralEvent::WakeLockAcquired(timeout));
        outcome(self.behavior, "wake lock").await?;
        self.held = true;
        Ok(())
    }

    async fn release(&mut self) -> PeripheralResult {
        self.log.record(PeripheralEvent::WakeLockReleased);
        self.held = false;
        outcome(self.behavior, "wake lock").await
    }

    fn is_held(&mut self) -> bool {
        self.held
    }
}

struct TestNotifier {
    log: EventLog,
    behavior: Behavior,
}

#[async_trait]
impl Notifier for TestNotifier {
    async fn show(&mut self, notification: &StatusNotification) -> PeripheralResult {
        self.log.record(PeripheralEvent::Shown(notification.clone()));
        outcome(self.behavior, "notification").await
    }

    async fn dismiss(&mut self) -> PeripheralResult {
        self.log.record(PeripheralEvent::Dismissed);
        outcome(self.behavior, "notification").await
    }
}

struct TestVibrator {
    log: EventLog,
    behavior: Behavior,
}

#[async_trait]
impl Vibrator for TestVibrator {
    async fn vibrate(&mut self, _pattern: &VibrationPattern) -> PeripheralResult {
        self.log.record(PeripheralEvent::Vibrated);
        outcome(self.behavior, "vibrator").await
    }

    async fn cancel(&mut self) -> PeripheralResult {
        self.log.record(PeripheralEvent::VibrationCancelled);
        outcome(self.behavior, "vibrator").await
    }
}

struct TestAlarm {
    log: EventLog,
    behavior: Behavior,
}

#[async_trait]
impl AlarmPlayer for TestAlarm {
    async fn play(&mut self) -> PeripheralResult {
        self.log.record(PeripheralEvent::AlarmPlayed);
        outcome(self.behavior, "alarm").await
    }

    async fn stop(&mut self) -> PeripheralResult {
        self.log.record(PeripheralEvent::AlarmStopped);
        outcome(self.behavior, "alarm").await
    }
}

fn build(behavior: Behavior) -> (Peripherals, EventLog) {
    let log = EventLog::default();
    let peripherals = Peripherals {
        wake_lock: Box::new(TestWakeLock {
            log: log.clone(),
            behavior,
            held: false,
        }),
        notifier: Box::new(TestNotifier {
            log: log.clone(),
            behavior,
        }),
        vibrator: Box::new(TestVibrator {
            log: log.clone(),
            behavior,
        }),
        alarm: Box::new(TestAlarm {
            log: log.clone(),
            behavior,
        }),
    };
    (peripherals, log)
}

/// Peripherals that succeed and record every call
pub fn recording() -> (Peripherals, EventLog) {
    build(Behavior::Succeed)
}

/// Peripherals where every call fails
pub fn failing() -> (Peripherals, EventLog) {
    build(Behavior::Fail)
}

/// Peripherals where every call records itself and then never completes
pub fn hanging() -> (Peripherals, EventLog) {
    build(Behavior::Hang)
}
