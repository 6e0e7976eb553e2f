//! Status notification content and the desktop notifier

use async_trait::async_trait;
use notify_rust::{Notification, NotificationHandle, Urgency};
use serde::Serialize;
use tracing::debug;

use super::{Notifier, PeripheralError, PeripheralResult};
use crate::utils::format_remaining;

/// Content of the status notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusNotification {
    pub title: String,
    pub body: String,
}

impl StatusNotification {
    /// Notification while a countdown is ticking
    pub fn running(remaining_seconds: u64) -> Self {
        Self {
            title: "Countdown running".to_string(),
            body: format!("Time remaining: {}", format_remaining(remaining_seconds)),
        }
    }

    /// Notification once the countdown reached zero
    pub fn finished() -> Self {
        Self {
            title: "Countdown finished!".to_string(),
            body: "Tap to view".to_string(),
        }
    }

    /// Plain fallback posted when the detailed notification fails
    pub fn simple() -> Self {
        Self {
            title: "Countdown".to_string(),
            body: "Countdown running".to_string(),
        }
    }
}

/// Latest wanted notification state, handed to the notification task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationRequest {
    /// Nothing posted yet
    Idle,
    Show {
        notification: StatusNotification,
        fallback: Option<StatusNotification>,
    },
    Dismiss,
}

/// Posts over the freedesktop notification interface, replacing the previous
/// notification in place
#[derive(Debug, Default)]
pub struct DesktopNotifier {
    handle: Option<NotificationHandle>,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Id of the notification currently on screen
    pub fn notification_id(&self) -> Option<u32> {
        self.handle.as_ref().map(NotificationHandle::id)
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn show(&mut self, notification: &StatusNotification) -> PeripheralResult {
        let replace_id = self.notification_id();
        debug!(?replace_id, "Posting notification: {}", notification.title);

        let mut n = Notification::new();
        n.appname("countdown-timer")
            .summary(&notification.title)
            .body(&notification.body)
            .icon("alarm-clock")
            .urgency(Urgency::Low);
        if let Some(id) = replace_id {
            n.id(id);
        }

        let handle = n
            .show_async()
            .await
            .map_err(|e| PeripheralError::Notification(e.to_string()))?;
        self.handle = Some(handle);
        Ok(())
    }

    async fn dismiss(&mut self) -> PeripheralResult {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        // Closing is a blocking D-Bus call
        tokio::task::spawn_blocking(move || handle.close())
            .await
            .map_err(|e| PeripheralError::Notification(e.to_string()))
    }
}
