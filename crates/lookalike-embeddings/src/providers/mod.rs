//! Embedding provider implementations.

mod http_provider;

use std::sync::Arc;

use lookalike_core::config::EmbeddingConfig;
use lookalike_core::errors::LookalikeResult;
use lookalike_core::traits::IEmbeddingProvider;

pub use http_provider::HttpEmbeddingProvider;

/// Build the configured provider. The API key is read from the
/// environment variable named by `api_key_env`.
pub fn create_provider(config: &EmbeddingConfig) -> LookalikeResult<Arc<dyn IEmbeddingProvider>> {
    Ok(Arc::new(HttpEmbeddingProvider::from_env(config)?))
}
