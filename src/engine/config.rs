//! Engine timing configuration

use std::time::Duration;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);
/// Extra wake lock time on top of the countdown itself
pub const DEFAULT_WAKE_LOCK_MARGIN: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_WAKE_LOCK: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_PERIPHERAL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub tick_period: Duration,
    pub wake_lock_margin: Duration,
    /// Hard ceiling for a single wake lock, whatever the countdown length
    pub max_wake_lock: Duration,
    /// Upper bound for any single peripheral call
    pub peripheral_timeout: Duration,
}

impl EngineConfig {
    /// How long to hold the wake lock for a countdown of `seconds`
    pub fn wake_lock_timeout(&self, seconds: u64) -> Duration {
        Duration::from_secs(seconds)
            .saturating_add(self.wake_lock_margin)
            .min(self.max_wake_lock)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period: DEFAULT_TICK_PERIOD,
            wake_lock_margin: DEFAULT_WAKE_LOCK_MARGIN,
            max_wake_lock: DEFAULT_MAX_WAKE_LOCK,
            peripheral_timeout: DEFAULT_PERIPHERAL_TIMEOUT,
        }
    }
}
