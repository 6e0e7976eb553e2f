//! Countdown Timer - A background countdown engine with alerts
//!
//! This library provides a countdown engine that keeps ticking independently
//! of any UI, holds a wake lock while it runs, and alerts through vibration,
//! a looping alarm sound and a status notification when it reaches zero.

pub mod config;
pub mod engine;
pub mod state;
pub mod observer;
pub mod preferences;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CountdownEngine, EngineConfig, EngineHandle};
pub use state::{AppState, CountdownState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
