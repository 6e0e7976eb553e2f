//! Background tasks module
//!
//! This module contains background tasks that run alongside the engine.

pub mod notification_task;

// Re-export main functions
pub use notification_task::notification_task;
