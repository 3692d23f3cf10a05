//! Observability
//!
//! Process logging through `tracing`, and the per-symbol trace that shows
//! the signal path through the machine.

pub mod logging;
pub mod trace;

pub use logging::{LogFormat, init_logging};
pub use trace::{HumanTraceSink, JsonTraceSink, NullSink, StepTrace, TraceEvent, TraceSink};
