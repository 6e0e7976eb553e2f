use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine task has exited and accepts no more commands
    #[error("countdown engine is not running")]
    Closed,
}
