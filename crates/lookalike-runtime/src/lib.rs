//! # lookalike-runtime
//!
//! [`LookalikeRuntime`] owns every engine. Construct it once and pass it
//! by reference (or `Arc`) to whatever serves requests.

mod runtime;

pub use runtime::{LookalikeRuntime, ReindexHandle, RuntimeOptions};
