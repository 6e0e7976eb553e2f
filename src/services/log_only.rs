//! Peripherals that only log, for hosts without a desktop session

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::info;

use super::{AlarmPlayer, Notifier, PeripheralResult, StatusNotification, WakeLock};

#[derive(Debug, Default)]
pub struct LogWakeLock {
    expires_at: Option<Instant>,
}

impl LogWakeLock {
    pub fn new() -> Self {
        Self { expires_at: None }
    }
}

#[async_trait]
impl WakeLock for LogWakeLock {
    async fn acquire(&mut self, timeout: Duration) -> PeripheralResult {
        info!("[WAKE LOCK] held for up to {}s", timeout.as_secs());
        self.expires_at = Some(Instant::now() + timeout);
        Ok(())
    }

    async fn release(&mut self) -> PeripheralResult {
        if self.expires_at.take().is_some() {
            info!("[WAKE LOCK] released");
        }
        Ok(())
    }

    fn is_held(&mut self) -> bool {
        match self.expires_at {
            Some(deadline) if Instant::now() < deadline => true,
            Some(_) => {
                self.expires_at = None;
                false
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct LogNotifier {
    last: Option<StatusNotification>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self { last: None }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn show(&mut self, notification: &StatusNotification) -> PeripheralResult {
        info!("[NOTIFICATION] {} - {}", notification.title, notification.body);
        self.last = Some(notification.clone());
        Ok(())
    }

    async fn dismiss(&mut self) -> PeripheralResult {
        if self.last.take().is_some() {
            info!("[NOTIFICATION] dismissed");
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct LogAlarm {
    playing: bool,
}

impl LogAlarm {
    pub fn new() -> Self {
        Self { playing: false }
    }
}

#[async_trait]
impl AlarmPlayer for LogAlarm {
    async fn play(&mut self) -> PeripheralResult {
        if !self.playing {
            info!("[ALARM] ringing");
            self.playing = true;
        }
        Ok(())
    }

    async fn stop(&mut self) -> PeripheralResult {
        if self.playing {
            info!("[ALARM] silenced");
            self.playing = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn log_wake_lock_expires_after_timeout() {
        let mut lock = LogWakeLock::new();
        lock.acquire(Duration::from_secs(5)).await.unwrap();
        assert!(lock.is_held());

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(!lock.is_held());
    }
}
