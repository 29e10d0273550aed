//! # lookalike-core
//!
//! Foundation crate for the Lookalike visual similarity search system.
//! Defines ids, models, traits, errors, config, constants and the shared
//! retry policy. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod ids;
pub mod models;
pub mod retry;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::LookalikeConfig;
pub use errors::{LookalikeError, LookalikeResult};
pub use ids::{Ordinal, PersistentId, ProductId};
pub use models::{
    NewVectorRecord, Product, ProductStatus, RebuildProgressEvent, SearchHit, VectorRecord,
};
pub use retry::RetryPolicy;
