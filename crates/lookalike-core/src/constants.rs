/// Lookalike system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Embedding dimensionality produced by the multimodal provider.
pub const EMBEDDING_DIMENSIONS: usize = 1024;

/// Tolerance for the unit-norm invariant on stored vectors.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-5;

/// Norms at or below this are treated as zero.
pub const DEGENERATE_NORM_EPSILON: f32 = 1e-12;

/// Maximum number of neighbors a single search may request.
pub const MAX_SEARCH_K: usize = 1000;

/// Message of the `complete` event when the reindex queue is empty.
pub const NOTHING_TO_INDEX_MESSAGE: &str = "all products already indexed";
