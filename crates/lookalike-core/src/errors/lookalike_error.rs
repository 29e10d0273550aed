use crate::ids::ProductId;

use super::{EmbeddingError, IndexError, StorageError};

/// Result alias used across the workspace.
pub type LookalikeResult<T> = Result<T, LookalikeError>;

/// Root error type. Subsystem errors fold into it via `From`.
#[derive(Debug, thiserror::Error)]
pub enum LookalikeError {
    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("index error: {0}")]
    IndexError(#[from] IndexError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("product not found: {id}")]
    ProductNotFound { id: ProductId },

    #[error("image not found: {reference}")]
    ImageNotFound { reference: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl LookalikeError {
    /// True for a provider throttling error that a retry policy may retry.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::EmbeddingError(e) if e.is_rate_limited())
    }
}
