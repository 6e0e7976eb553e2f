//! Peripheral services module
//!
//! The engine talks to the wake lock, status notification, vibrator and alarm
//! player through the traits defined here. Host implementations shell out to
//! desktop tools; the log-only ones are used when those are unavailable.

pub mod alarm;
pub mod log_only;
pub mod notifier;
pub mod system;
pub mod vibrator;
pub mod wake_lock;

#[cfg(test)]
pub mod testing;

use std::{future::Future, path::PathBuf, time::Duration};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub use alarm::LoopingAlarm;
pub use log_only::{LogAlarm, LogNotifier, LogWakeLock};
pub use notifier::{DesktopNotifier, NotificationRequest, StatusNotification};
pub use system::check_peripheral_commands;
pub use vibrator::{LogVibrator, VibrationPattern};
pub use wake_lock::InhibitWakeLock;

/// Failure of a peripheral action. Never fatal to a countdown.
#[derive(Debug, Error)]
pub enum PeripheralError {
    #[error("{0} is unavailable")]
    Unavailable(String),

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: &'static str,
        status: String,
        stderr: String,
    },

    #[error("notification server: {0}")]
    Notification(String),

    #[error("{0} timed out")]
    TimedOut(String),
}

pub type PeripheralResult = Result<(), PeripheralError>;

/// CPU/system sleep prevention handle
#[async_trait]
pub trait WakeLock: Send {
    /// Hold the lock for at most `timeout`
    async fn acquire(&mut self, timeout: Duration) -> PeripheralResult;
    async fn release(&mut self) -> PeripheralResult;
    fn is_held(&mut self) -> bool;
}

/// The single persistent status notification
#[async_trait]
pub trait Notifier: Send {
    async fn show(&mut self, notification: &StatusNotification) -> PeripheralResult;
    async fn dismiss(&mut self) -> PeripheralResult;
}

#[async_trait]
pub trait Vibrator: Send {
    async fn vibrate(&mut self, pattern: &VibrationPattern) -> PeripheralResult;
    async fn cancel(&mut self) -> PeripheralResult;
}

/// Looping alarm sound
#[async_trait]
pub trait AlarmPlayer: Send {
    async fn play(&mut self) -> PeripheralResult;
    async fn stop(&mut self) -> PeripheralResult;
}

/// Everything the engine owns exclusively
pub struct Peripherals {
    pub wake_lock: Box<dyn WakeLock>,
    pub notifier: Box<dyn Notifier>,
    pub vibrator: Box<dyn Vibrator>,
    pub alarm: Box<dyn AlarmPlayer>,
}

impl Peripherals {
    /// Host peripherals backed by systemd-inhibit, desktop notifications and paplay
    pub fn system(alarm_sound: Option<PathBuf>) -> Self {
        let alarm = match alarm_sound {
            Some(path) => LoopingAlarm::new(path),
            None => LoopingAlarm::with_default_sound(),
        };
        Self {
            wake_lock: Box::new(InhibitWakeLock::new()),
            notifier: Box::new(DesktopNotifier::new()),
            vibrator: Box::new(LogVibrator::new()),
            alarm: Box::new(alarm),
        }
    }

    /// Peripherals that only log what they would do
    pub fn log_only() -> Self {
        Self {
            wake_lock: Box::new(LogWakeLock::new()),
            notifier: Box::new(LogNotifier::new()),
            vibrator: Box::new(LogVibrator::new()),
            alarm: Box::new(LogAlarm::new()),
        }
    }
}

/// Run a peripheral action, bounded by `limit`, logging and absorbing any failure.
///
/// Returns whether the action succeeded.
pub async fn best_effort<F>(action: &str, limit: Duration, fut: F) -> bool
where
    F: Future<Output = PeripheralResult>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!("{} failed: {}", action, e);
            false
        }
        Err(_) => {
            warn!("{}", PeripheralError::TimedOut(action.to_string()));
            false
        }
    }
}
