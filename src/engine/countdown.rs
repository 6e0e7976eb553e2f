//! The countdown engine task
//!
//! One task owns the countdown state, the tick interval and every peripheral.
//! Commands and ticks are handled strictly one after another, so a run can be
//! replaced or stopped at any point without two timers ever overlapping.

use std::{ops::ControlFlow, sync::Arc};

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::{interval_at, Instant, Interval},
};
use tracing::{debug, info, warn};

use super::{handle::Command, EngineConfig, EngineHandle};
use crate::{
    services::{
        best_effort, AlarmPlayer, NotificationRequest, Notifier, Peripherals, StatusNotification,
        VibrationPattern, Vibrator, WakeLock,
    },
    state::{AlertSettings, CountdownState, Phase, SettingsUpdate},
    tasks::notification_task,
};

const COMMAND_BUFFER: usize = 32;

pub struct CountdownEngine {
    config: EngineConfig,
    commands: mpsc::Receiver<Command>,
    state: Arc<watch::Sender<CountdownState>>,
    notifications: watch::Sender<NotificationRequest>,
    /// Handed to the notification task when the engine starts running
    pending_notifier: Option<(Box<dyn Notifier>, watch::Receiver<NotificationRequest>)>,
    wake_lock: Box<dyn WakeLock>,
    vibrator: Box<dyn Vibrator>,
    alarm: Box<dyn AlarmPlayer>,
    /// Present only while a run is ticking
    ticker: Option<Interval>,
    vibrating: bool,
    sounding: bool,
}

impl CountdownEngine {
    pub fn new(config: EngineConfig, peripherals: Peripherals) -> (Self, EngineHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (state_tx, _) = watch::channel(CountdownState::new());
        let state = Arc::new(state_tx);
        let (notifications, notification_rx) = watch::channel(NotificationRequest::Idle);

        let engine = Self {
            config,
            commands: command_rx,
            state: Arc::clone(&state),
            notifications,
            pending_notifier: Some((peripherals.notifier, notification_rx)),
            wake_lock: peripherals.wake_lock,
            vibrator: peripherals.vibrator,
            alarm: peripherals.alarm,
            ticker: None,
            vibrating: false,
            sounding: false,
        };
        (engine, EngineHandle::new(command_tx, state))
    }

    /// Create an engine and run it on the current tokio runtime
    pub fn spawn(config: EngineConfig, peripherals: Peripherals) -> (EngineHandle, JoinHandle<()>) {
        let (engine, handle) = Self::new(config, peripherals);
        (handle, tokio::spawn(engine.run()))
    }

    /// Process commands and ticks until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!("Starting countdown engine");

        let notification_worker = self.pending_notifier.take().map(|(notifier, requests)| {
            tokio::spawn(notification_task(notifier, requests, self.config.peripheral_timeout))
        });

        let shutdown_ack = loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => {
                        if let ControlFlow::Break(ack) = self.handle_command(command).await {
                            break Some(ack);
                        }
                    }
                    None => {
                        debug!("All engine handles dropped");
                        break None;
                    }
                },
                _ = next_tick(&mut self.ticker) => self.tick().await,
            }
        };

        self.stop().await;
        self.notifications.send_replace(NotificationRequest::Dismiss);
        drop(self.notifications);

        if let Some(worker) = notification_worker {
            let limit = self.config.peripheral_timeout * 2;
            if tokio::time::timeout(limit, worker).await.is_err() {
                warn!("Notification task did not finish within {:?}", limit);
            }
        }

        info!("Countdown engine stopped");
        if let Some(ack) = shutdown_ack {
            let _ = ack.send(());
        }
    }

    async fn handle_command(&mut self, command: Command) -> ControlFlow<oneshot::Sender<()>> {
        match command {
            Command::Start { seconds, settings, ack } => {
                let accepted = self.start(seconds, settings).await;
                let _ = ack.send(accepted);
            }
            Command::Stop { ack } => {
                self.stop().await;
                let _ = ack.send(());
            }
            Command::UpdateSettings { update, ack } => {
                let state = self.update_settings(update).await;
                let _ = ack.send(state);
            }
            Command::Shutdown { ack } => return ControlFlow::Break(ack),
        }
        ControlFlow::Continue(())
    }

    async fn start(&mut self, seconds: u64, settings: AlertSettings) -> bool {
        if seconds == 0 {
            debug!("Ignoring countdown start with zero duration");
            return false;
        }
        let started_at = Instant::now();

        let previous = self.state.borrow().phase;
        if previous != Phase::Idle {
            info!("Restarting countdown (previous run was {:?})", previous);
        }

        // Tear down whatever the previous run left behind
        self.ticker = None;
        self.silence_alerts().await;
        self.release_wake_lock().await;

        self.state.send_modify(|state| state.begin_run(seconds, settings));
        let run_id = self.state.borrow().run_id;
        info!(
            "Countdown #{} started for {}s (vibration={}, alarm={})",
            run_id, seconds, settings.vibration, settings.alarm_sound
        );

        let timeout = self.config.wake_lock_timeout(seconds);
        best_effort(
            "Wake lock acquisition",
            self.config.peripheral_timeout,
            self.wake_lock.acquire(timeout),
        )
        .await;

        self.notifications.send_replace(NotificationRequest::Show {
            notification: StatusNotification::running(seconds),
            fallback: Some(StatusNotification::simple()),
        });

        let period = self.config.tick_period;
        self.ticker = Some(interval_at(started_at + period, period));
        true
    }

    async fn tick(&mut self) {
        let mut remaining = 0;
        self.state.send_modify(|state| remaining = state.decrement());

        if remaining > 0 {
            debug!("Countdown tick: {}s remaining", remaining);
            self.notifications.send_replace(NotificationRequest::Show {
                notification: StatusNotification::running(remaining),
                fallback: None,
            });
            return;
        }

        self.ticker = None;
        self.finish().await;
    }

    /// Fire the expiry alerts, then publish the finished state
    async fn finish(&mut self) {
        let settings = self.state.borrow().settings();
        let limit = self.config.peripheral_timeout;
        info!("Countdown reached zero");

        if settings.vibration {
            self.vibrating = true;
            best_effort("Vibration", limit, self.vibrator.vibrate(&VibrationPattern::alarm())).await;
        }
        if settings.alarm_sound {
            self.sounding = true;
            best_effort("Alarm sound", limit, self.alarm.play()).await;
        }

        self.state.send_modify(CountdownState::mark_finished);
        self.notifications.send_replace(NotificationRequest::Show {
            notification: StatusNotification::finished(),
            fallback: None,
        });
    }

    async fn stop(&mut self) {
        self.ticker = None;
        self.silence_alerts().await;
        self.release_wake_lock().await;

        let previous = self.state.borrow().phase;
        if previous == Phase::Idle {
            debug!("Stop requested with no active countdown");
            return;
        }

        self.state.send_modify(CountdownState::mark_stopped);
        let remaining = self.state.borrow().remaining_seconds;
        info!("Countdown stopped from {:?} with {}s remaining", previous, remaining);
    }

    async fn update_settings(&mut self, update: SettingsUpdate) -> CountdownState {
        self.state.send_modify(|state| state.apply_settings(update));
        let settings = self.state.borrow().settings();
        debug!(
            "Alert settings updated: vibration={}, alarm={}",
            settings.vibration, settings.alarm_sound
        );

        let limit = self.config.peripheral_timeout;
        if !settings.vibration && std::mem::take(&mut self.vibrating) {
            best_effort("Vibration cancel", limit, self.vibrator.cancel()).await;
        }
        if !settings.alarm_sound && std::mem::take(&mut self.sounding) {
            best_effort("Alarm stop", limit, self.alarm.stop()).await;
        }

        self.state.borrow().clone()
    }

    async fn silence_alerts(&mut self) {
        let limit = self.config.peripheral_timeout;
        if std::mem::take(&mut self.vibrating) {
            best_effort("Vibration cancel", limit, self.vibrator.cancel()).await;
        }
        if std::mem::take(&mut self.sounding) {
            best_effort("Alarm stop", limit, self.alarm.stop()).await;
        }
    }

    async fn release_wake_lock(&mut self) {
        if self.wake_lock.is_held() {
            best_effort(
                "Wake lock release",
                self.config.peripheral_timeout,
                self.wake_lock.release(),
            )
            .await;
        }
    }
}

/// Resolves on the next tick, or never when no run is active
async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
