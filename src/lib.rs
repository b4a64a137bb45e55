#![doc = include_str!("../README.md")]

/// Pure operator semantics and traced value types
pub mod compare;
/// Coverage counter service
pub mod counters;
/// Lifecycle interface of the native fuzzing engine
pub mod engine;
/// Error types
pub mod error;
/// Comparison feedback channels
pub mod feedback;
/// Hook descriptors and bookkeeping
pub mod hooks;
/// `tracing` subscriber setup
pub mod logging;
/// Runtime configuration options
pub mod options;
/// Line-oriented hook diagnostics
pub mod report;
/// SanitizerCoverage-backed feedback channel
#[cfg(all(unix, feature = "sanitizer_hooks"))]
pub mod sancov;
/// Session state shared by instrumentation and reporting
mod session;
/// Traced stand-ins for comparison operators
pub mod tracer;

pub use compare::{EqualityOperator, Operator, TracedValue};
pub use error::{CounterError, EngineError, SessionError, TraceError};
pub use feedback::{CompareFeedback, ComparisonOperandMap};
pub use hooks::{Hook, HookIdentity, HookRegistry, HookSummary, HookTracker, HookType, TrackedHook};
pub use options::RuntimeOptions;
#[cfg(all(unix, feature = "sanitizer_hooks"))]
pub use sancov::SanitizerFeedback;
pub use session::*;
pub use tracer::ComparisonTracer;
