use crate::error::EngineError;

/// Lifecycle of the native fuzzing engine.
///
/// The engine owns the fuzzing loop, its corpus and its mutators. A session
/// only starts it, stops it and forwards the engine's own command-line
/// arguments to it untouched.
pub trait FuzzingEngine {
    /// Runs the fuzzing loop to completion on the calling thread
    fn start_fuzzing(&mut self, args: &[String]) -> Result<(), EngineError>;

    /// Starts the fuzzing loop and returns once it is running
    fn start_fuzzing_async(&mut self, args: &[String]) -> Result<(), EngineError>;

    /// Asks a running loop to wind down, optionally with an exit status
    fn stop_fuzzing_async(&mut self, status: Option<i32>) -> Result<(), EngineError>;

    fn print_version(&self);
}
