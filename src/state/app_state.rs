//! Shared state for the HTTP layer

use std::{sync::Mutex, time::Instant};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{engine::EngineHandle, preferences::PreferencesStore, utils::format_uptime};

/// Everything the HTTP handlers need.
///
/// The countdown itself lives in the engine; this only holds a handle to it.
#[derive(Debug)]
pub struct AppState {
    pub engine: EngineHandle,
    pub preferences: PreferencesStore,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last command tracking
    pub last_command: Mutex<Option<(String, DateTime<Utc>)>>,
}

impl AppState {
    pub fn new(engine: EngineHandle, preferences: PreferencesStore, port: u16, host: String) -> Self {
        Self {
            engine,
            preferences,
            start_time: Instant::now(),
            port,
            host,
            last_command: Mutex::new(None),
        }
    }

    /// Remember the last command sent to the engine
    pub fn record_command(&self, command: &str) {
        debug!("Recording command: {}", command);
        if let Ok(mut last) = self.last_command.lock() {
            *last = Some((command.to_string(), Utc::now()));
        }
    }

    /// Get last command information
    pub fn get_last_command(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        match self.last_command.lock().ok().and_then(|last| last.clone()) {
            Some((command, time)) => (Some(command), Some(time)),
            None => (None, None),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed().as_secs())
    }
}
