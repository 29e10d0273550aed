//! Span definitions per operation: embedding, search, ingest, reindex.

/// Create an embedding span.
#[macro_export]
macro_rules! embedding_span {
    ($provider:expr, $dimension:expr) => {
        tracing::info_span!("lookalike.embedding", provider = %$provider, dimension = $dimension)
    };
}

/// Create a similarity search span.
#[macro_export]
macro_rules! search_span {
    ($k:expr) => {
        tracing::info_span!("lookalike.search", k = $k)
    };
}

/// Create a single-image ingestion span.
#[macro_export]
macro_rules! ingest_span {
    ($product_id:expr, $image_reference:expr) => {
        tracing::info_span!(
            "lookalike.ingest",
            product_id = %$product_id,
            image_reference = %$image_reference
        )
    };
}

/// Create a bulk reindex span.
#[macro_export]
macro_rules! reindex_span {
    ($run_id:expr) => {
        tracing::info_span!("lookalike.reindex", run_id = %$run_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const EMBEDDING: &str = "lookalike.embedding";
    pub const SEARCH: &str = "lookalike.search";
    pub const INGEST: &str = "lookalike.ingest";
    pub const REINDEX: &str = "lookalike.reindex";
}
