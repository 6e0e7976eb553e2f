//! Countdown state published by the engine

use serde::{Deserialize, Serialize};

use crate::utils::format_remaining;

/// Lifecycle phase of a countdown run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Which alerts fire when a countdown expires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub vibration: bool,
    pub alarm_sound: bool,
}

impl AlertSettings {
    pub fn new(vibration: bool, alarm_sound: bool) -> Self {
        Self { vibration, alarm_sound }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            vibration: false,
            alarm_sound: true,
        }
    }
}

/// Partial settings change; `None` keeps the current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub vibration: Option<bool>,
    #[serde(default)]
    pub alarm: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.vibration.is_none() && self.alarm.is_none()
    }
}

/// Snapshot of the engine's countdown.
///
/// The engine task is the only writer; everyone else sees clones of this
/// through a `watch` channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    pub phase: Phase,
    /// Incremented on every accepted start
    pub run_id: u64,
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub is_finished: bool,
    pub vibration_enabled: bool,
    pub alarm_sound_enabled: bool,
}

impl CountdownState {
    /// Create an idle state with default alert settings
    pub fn new() -> Self {
        let settings = AlertSettings::default();
        Self {
            phase: Phase::Idle,
            run_id: 0,
            total_seconds: 0,
            remaining_seconds: 0,
            is_finished: false,
            vibration_enabled: settings.vibration,
            alarm_sound_enabled: settings.alarm_sound,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn settings(&self) -> AlertSettings {
        AlertSettings::new(self.vibration_enabled, self.alarm_sound_enabled)
    }

    /// Reset for a fresh run of `total_seconds`
    pub fn begin_run(&mut self, total_seconds: u64, settings: AlertSettings) {
        self.phase = Phase::Running;
        self.run_id += 1;
        self.total_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
        self.is_finished = false;
        self.vibration_enabled = settings.vibration;
        self.alarm_sound_enabled = settings.alarm_sound;
    }

    /// Take one second off the count. Never goes below zero.
    pub fn decrement(&mut self) -> u64 {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.remaining_seconds
    }

    pub fn mark_finished(&mut self) {
        self.phase = Phase::Finished;
        self.remaining_seconds = 0;
        self.is_finished = true;
    }

    /// Back to idle, keeping the last observed count
    pub fn mark_stopped(&mut self) {
        self.phase = Phase::Idle;
        self.is_finished = false;
    }

    pub fn apply_settings(&mut self, update: SettingsUpdate) {
        if let Some(vibration) = update.vibration {
            self.vibration_enabled = vibration;
        }
        if let Some(alarm) = update.alarm {
            self.alarm_sound_enabled = alarm;
        }
    }

    /// Remaining time as `MM:SS` or `HH:MM:SS`
    pub fn formatted_remaining(&self) -> String {
        format_remaining(self.remaining_seconds)
    }
}

impl Default for CountdownState {
    fn default() -> Self {
        Self::new()
    }
}
