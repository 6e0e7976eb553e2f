//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod signals;
pub mod time_format;

// Re-export main functions
pub use signals::shutdown_signal;
pub use time_format::{format_remaining, format_uptime};
