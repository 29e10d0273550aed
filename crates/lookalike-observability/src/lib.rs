//! # lookalike-observability
//!
//! Subscriber setup driven by `[observability]` config, span macros for
//! the long-running operations, and structured events for the few
//! moments worth recording on their own.

pub mod tracing_setup;

pub use tracing_setup::{build_filter, events, init_tracing, spans};
