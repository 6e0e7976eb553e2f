//! Command and observation handle for a running engine

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use super::EngineError;
use crate::state::{AlertSettings, CountdownState, SettingsUpdate};

/// Messages processed one at a time by the engine task
#[derive(Debug)]
pub(crate) enum Command {
    Start {
        seconds: u64,
        settings: AlertSettings,
        ack: oneshot::Sender<bool>,
    },
    Stop {
        ack: oneshot::Sender<()>,
    },
    UpdateSettings {
        update: SettingsUpdate,
        ack: oneshot::Sender<CountdownState>,
    },
    Shutdown {
        ack: oneshot::Sender<()>,
    },
}

/// Cheap, cloneable handle to a countdown engine.
///
/// Every write goes through the engine's mailbox. Each command waits for its
/// acknowledgement, so once `stop()` returns no later tick can be observed.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    state: Arc<watch::Sender<CountdownState>>,
}

impl EngineHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<Command>,
        state: Arc<watch::Sender<CountdownState>>,
    ) -> Self {
        Self { commands, state }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, EngineError> {
        let (ack, reply) = oneshot::channel();
        self.commands
            .send(build(ack))
            .await
            .map_err(|_| EngineError::Closed)?;
        reply.await.map_err(|_| EngineError::Closed)
    }

    /// Start (or restart) a countdown. Returns `false` if `seconds` is zero.
    pub async fn start(&self, seconds: u64, vibration: bool, alarm: bool) -> Result<bool, EngineError> {
        let settings = AlertSettings::new(vibration, alarm);
        self.request(|ack| Command::Start { seconds, settings, ack }).await
    }

    /// Stop the current countdown and silence any alert. Safe when idle.
    pub async fn stop(&self) -> Result<(), EngineError> {
        self.request(|ack| Command::Stop { ack }).await
    }

    /// Change alert settings without touching the count
    pub async fn update_settings(&self, update: SettingsUpdate) -> Result<CountdownState, EngineError> {
        self.request(|ack| Command::UpdateSettings { update, ack }).await
    }

    /// Stop, dismiss the notification and end the engine task.
    ///
    /// Calling it on an engine that is already gone is not an error.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        match self.request(|ack| Command::Shutdown { ack }).await {
            Ok(()) | Err(EngineError::Closed) => Ok(()),
        }
    }

    /// Attach an observer. Dropping the receiver detaches it.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CountdownState {
        self.state.borrow().clone()
    }

    pub fn observer_count(&self) -> usize {
        self.state.receiver_count()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}
