//! Configuration, loaded from TOML with defaults for every field.

pub mod defaults;
mod embedding_config;
mod observability_config;
mod reindex_config;
mod retry_config;
mod search_config;
mod storage_config;

pub use embedding_config::EmbeddingConfig;
pub use observability_config::ObservabilityConfig;
pub use reindex_config::ReindexConfig;
pub use retry_config::RetryConfig;
pub use search_config::SearchConfig;
pub use storage_config::StorageConfig;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_SEARCH_K;
use crate::errors::{LookalikeError, LookalikeResult};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LookalikeConfig {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retry: RetryConfig,
    pub search: SearchConfig,
    pub reindex: ReindexConfig,
    pub observability: ObservabilityConfig,
}

impl LookalikeConfig {
    /// Parse and validate a TOML document. Missing sections and fields
    /// fall back to defaults.
    pub fn from_toml(toml_str: &str) -> LookalikeResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| LookalikeError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> LookalikeResult<()> {
        let e = &self.embedding;
        if e.dimensions == 0 {
            return Err(invalid("embedding.dimensions must be greater than 0"));
        }
        if e.max_payload_bytes == 0 {
            return Err(invalid("embedding.max_payload_bytes must be greater than 0"));
        }
        if e.min_quality == 0 || e.min_quality > e.initial_quality || e.initial_quality > 100 {
            return Err(invalid(
                "embedding quality must satisfy 0 < min_quality <= initial_quality <= 100",
            ));
        }
        if e.quality_step == 0 {
            return Err(invalid("embedding.quality_step must be greater than 0"));
        }
        if !(e.downscale_safety > 0.0 && e.downscale_safety < 1.0) {
            return Err(invalid("embedding.downscale_safety must be in (0, 1)"));
        }
        if e.jitter_min_ms > e.jitter_max_ms {
            return Err(invalid("embedding.jitter_min_ms must not exceed jitter_max_ms"));
        }
        if self.retry.max_attempts == 0 {
            return Err(invalid("retry.max_attempts must be at least 1"));
        }
        if self.retry.backoff_multiplier < 1.0 {
            return Err(invalid("retry.backoff_multiplier must be >= 1.0"));
        }
        if self.search.max_top_k > MAX_SEARCH_K {
            return Err(LookalikeError::ConfigError(format!(
                "search.max_top_k must not exceed {MAX_SEARCH_K}"
            )));
        }
        if self.search.default_top_k == 0 || self.search.default_top_k > self.search.max_top_k {
            return Err(invalid("search.default_top_k must be within 1..=max_top_k"));
        }
        if self.reindex.channel_capacity == 0 {
            return Err(invalid("reindex.channel_capacity must be greater than 0"));
        }
        if self.storage.read_pool_size == 0 {
            return Err(invalid("storage.read_pool_size must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> LookalikeError {
    LookalikeError::ConfigError(message.to_string())
}
