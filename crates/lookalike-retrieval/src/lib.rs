//! # lookalike-retrieval
//!
//! Query image → embedding → nearest neighbors → live records →
//! similarity scores → one hit per product, best first.

pub mod engine;
pub mod ranking;

pub use engine::SimilarityResolver;
pub use ranking::distance_to_similarity;
