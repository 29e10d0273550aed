//! Scoring and product-level deduplication of search hits.

mod dedup;

pub use dedup::{best_per_product, rank};

/// Map a Euclidean distance to a score in `(0, 1]`. Zero distance scores
/// exactly 1 and the score strictly decreases as distance grows.
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance.max(0.0))
}
