use thiserror::Error;

/// Errors raised while tracing a comparison site.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// The instrumentation emitted an operator symbol we don't know how to
    /// evaluate. This is a bug in whatever generated the call site.
    #[error("unrecognized comparison operator: {0:?}")]
    UnrecognizedOperator(String),
}

/// Errors reported by a [`crate::engine::FuzzingEngine`] implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("fuzzing engine failed to start: {reason}")]
    Start { reason: String },

    #[error("fuzzing engine is already running")]
    AlreadyRunning,

    #[error("fuzzing engine is not running")]
    NotRunning,
}

/// Errors from the counter service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CounterError {
    #[error("coverage counters exhausted (capacity {capacity})")]
    Exhausted { capacity: usize },
}

/// Errors surfaced by a [`crate::Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("invalid runtime options: {0}")]
    Options(#[from] clap::Error),

    #[error("failed to serialize hook summary: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write hook report: {0}")]
    Io(#[from] std::io::Error),
}
