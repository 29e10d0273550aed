//! # lookalike-embeddings
//!
//! Turns raw image bytes into unit-norm embedding vectors: payload
//! encoding under a size budget, the multimodal HTTP provider, a
//! content-addressed vector cache, and the `ImageEmbedder` that ties them
//! together with jitter and rate-limit retries.

pub mod cache;
pub mod encoder;
pub mod engine;
pub mod normalize;
pub mod providers;

pub use encoder::PayloadEncoder;
pub use engine::ImageEmbedder;
