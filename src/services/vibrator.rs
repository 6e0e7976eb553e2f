//! Vibration pattern and the host vibrator
//!
//! Desktop hosts have no haptics, so the vibrator only records and logs the
//! pattern it would play.

use async_trait::async_trait;
use tracing::info;

use super::{PeripheralResult, Vibrator};

/// Alternating wait/vibrate durations in milliseconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VibrationPattern {
    pub timings_ms: Vec<u64>,
    /// Index to loop back to after the last timing, `None` plays once
    pub repeat_from: Option<usize>,
}

impl VibrationPattern {
    /// One second on, one second off, until cancelled
    pub fn alarm() -> Self {
        Self {
            timings_ms: vec![0, 1000, 1000],
            repeat_from: Some(0),
        }
    }

    pub fn cycle_ms(&self) -> u64 {
        self.timings_ms.iter().sum()
    }
}

#[derive(Debug, Default)]
pub struct LogVibrator {
    active: Option<VibrationPattern>,
}

impl LogVibrator {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_vibrating(&self) -> bool {
        self.active.is_some()
    }
}

#[async_trait]
impl Vibrator for LogVibrator {
    async fn vibrate(&mut self, pattern: &VibrationPattern) -> PeripheralResult {
        info!(
            "Vibrating with pattern {:?} (repeat from {:?})",
            pattern.timings_ms, pattern.repeat_from
        );
        self.active = Some(pattern.clone());
        Ok(())
    }

    async fn cancel(&mut self) -> PeripheralResult {
        if self.active.take().is_some() {
            info!("Vibration cancelled");
        }
        Ok(())
    }
}
