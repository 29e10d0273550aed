use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Embedding extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Multimodal embedding REST endpoint.
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the provider API key.
    pub api_key_env: String,
    /// Fixed vector dimensionality for the process lifetime.
    pub dimensions: usize,
    /// Encoded JPEG size above which the image is downscaled.
    pub max_payload_bytes: usize,
    pub initial_quality: u8,
    pub quality_step: u8,
    pub min_quality: u8,
    /// Multiplier applied to `sqrt(threshold / size)` when downscaling.
    pub downscale_safety: f64,
    /// Random delay range before each provider call.
    pub jitter_min_ms: u64,
    pub jitter_max_ms: u64,
    pub request_timeout_secs: u64,
    /// Extracted-vector cache entries. 0 disables the cache.
    pub cache_capacity: u64,
}

impl EmbeddingConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::DEFAULT_EMBEDDING_ENDPOINT.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            dimensions: defaults::DEFAULT_DIMENSIONS,
            max_payload_bytes: defaults::DEFAULT_MAX_PAYLOAD_BYTES,
            initial_quality: defaults::DEFAULT_INITIAL_QUALITY,
            quality_step: defaults::DEFAULT_QUALITY_STEP,
            min_quality: defaults::DEFAULT_MIN_QUALITY,
            downscale_safety: defaults::DEFAULT_DOWNSCALE_SAFETY,
            jitter_min_ms: defaults::DEFAULT_JITTER_MIN_MS,
            jitter_max_ms: defaults::DEFAULT_JITTER_MAX_MS,
            request_timeout_secs: defaults::DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_capacity: defaults::DEFAULT_CACHE_CAPACITY,
        }
    }
}
