//! # lookalike-index
//!
//! In-memory nearest-neighbor search over stored image vectors.
//!
//! - [`FlatIndex`]: exact Euclidean search, no deletion.
//! - [`IndexMapping`]: ordinal → persistent id, kept bijective.
//! - [`VectorStoreSync`]: loads both from durable storage and keeps them
//!   consistent under concurrent readers.

pub mod flat;
pub mod mapping;
pub mod sync;

pub use flat::FlatIndex;
pub use mapping::IndexMapping;
pub use sync::{IndexHit, IndexStats, VectorStoreSync};
