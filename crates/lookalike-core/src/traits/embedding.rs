use crate::errors::LookalikeResult;
use crate::models::ImagePayload;

/// External multimodal embedding provider.
///
/// Implementations must report throttling as
/// `EmbeddingError::RateLimited` so callers can retry it; every other
/// failure is treated as fatal.
pub trait IEmbeddingProvider: Send + Sync {
    /// Embed one encoded image, returning the raw (unnormalized) vector.
    fn embed_image(&self, payload: &ImagePayload) -> LookalikeResult<Vec<f32>>;

    /// The dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
