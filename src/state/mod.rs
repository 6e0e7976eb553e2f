//! State management module
//!
//! This module contains the published countdown state and the HTTP layer's
//! shared state.

pub mod app_state;
pub mod countdown_state;

// Re-export main types
pub use app_state::AppState;
pub use countdown_state::{AlertSettings, CountdownState, Phase, SettingsUpdate};
