/// Embedding extraction errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    /// The provider signalled throttling. Retryable.
    #[error("provider {provider} rate limited: {message}")]
    RateLimited { provider: String, message: String },

    #[error("rate limit persisted after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// Any non-throttling provider failure. Never retried.
    #[error("provider {provider} failed: {reason}")]
    ProviderFailed { provider: String, reason: String },

    #[error("embedding has zero norm")]
    DegenerateVector,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid image: {reason}")]
    InvalidImage { reason: String },

    #[error("payload encoding failed: {reason}")]
    EncodingFailed { reason: String },
}

impl EmbeddingError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
