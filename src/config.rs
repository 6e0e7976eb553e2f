//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::engine::EngineConfig;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-timer")]
#[command(about = "A background countdown engine with alarm, vibration and notification alerts")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Seconds the wake lock outlives the countdown
    #[arg(long, default_value = "60")]
    pub wake_lock_margin: u64,

    /// Upper bound for a single wake lock, in seconds
    #[arg(long, default_value = "86400")]
    pub max_wake_lock: u64,

    /// Where user preferences are stored
    #[arg(long, default_value = "countdown-preferences.json")]
    pub preferences: PathBuf,

    /// Sound file looped when a countdown finishes
    #[arg(long)]
    pub alarm_sound: Option<PathBuf>,

    /// Log alerts instead of using systemd-inhibit, desktop notifications and paplay
    #[arg(long)]
    pub no_system_peripherals: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            wake_lock_margin: Duration::from_secs(self.wake_lock_margin),
            max_wake_lock: Duration::from_secs(self.max_wake_lock),
            ..EngineConfig::default()
        }
    }
}
