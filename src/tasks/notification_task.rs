//! Status notification background task

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::services::{best_effort, NotificationRequest, Notifier};

/// Posts the latest requested notification.
///
/// Requests arrive through a `watch` channel, so a slow notifier only ever
/// posts the newest state and an older tick can never overwrite a newer one.
/// Returns once the engine drops its sender.
pub async fn notification_task(
    mut notifier: Box<dyn Notifier>,
    mut requests: watch::Receiver<NotificationRequest>,
    limit: Duration,
) {
    info!("Starting notification task");

    while requests.changed().await.is_ok() {
        let request = requests.borrow_and_update().clone();
        match request {
            NotificationRequest::Idle => {}
            NotificationRequest::Show { notification, fallback } => {
                let posted = best_effort("Status notification", limit, notifier.show(&notification)).await;
                if !posted {
                    if let Some(fallback) = fallback {
                        debug!("Posting simple fallback notification");
                        best_effort("Fallback notification", limit, notifier.show(&fallback)).await;
                    }
                }
            }
            NotificationRequest::Dismiss => {
                best_effort("Notification dismissal", limit, notifier.dismiss()).await;
            }
        }
    }

    debug!("Notification requests closed, stopping notification task");
}
