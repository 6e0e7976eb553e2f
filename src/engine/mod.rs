//! Countdown engine module
//!
//! The engine is an explicitly owned task: create it with
//! [`CountdownEngine::spawn`], talk to it through the returned
//! [`EngineHandle`], and end it with [`EngineHandle::shutdown`].

pub mod config;
pub mod countdown;
pub mod error;
pub mod handle;

#[cfg(test)]
mod tests;

pub use config::EngineConfig;
pub use countdown::CountdownEngine;
pub use error::EngineError;
pub use handle::EngineHandle;
