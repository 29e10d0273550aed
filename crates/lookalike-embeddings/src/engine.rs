//! ImageEmbedder: raw image bytes in, unit-norm vector out.
//!
//! encode payload → jitter → provider call (rate limits retried per
//! `RetryPolicy`) → dimension check → L2 normalize. A cache hit on the
//! blake3 hash of the bytes skips everything after the lookup.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use lookalike_core::config::{EmbeddingConfig, LookalikeConfig};
use lookalike_core::errors::{EmbeddingError, LookalikeError, LookalikeResult};
use lookalike_core::retry::RetryPolicy;
use lookalike_core::traits::IEmbeddingProvider;
use lookalike_observability::embedding_span;

use crate::cache::{content_key, VectorCache};
use crate::encoder::PayloadEncoder;
use crate::normalize;

type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Turns image bytes into unit-norm vectors through an embedding provider.
pub struct ImageEmbedder {
    provider: Arc<dyn IEmbeddingProvider>,
    encoder: PayloadEncoder,
    retry: RetryPolicy,
    cache: Option<VectorCache>,
    dimensions: usize,
    jitter_min: Duration,
    jitter_max: Duration,
    sleeper: Sleeper,
}

impl ImageEmbedder {
    pub fn new(
        provider: Arc<dyn IEmbeddingProvider>,
        config: &EmbeddingConfig,
        retry: RetryPolicy,
    ) -> Self {
        let cache = (config.cache_capacity > 0).then(|| VectorCache::new(config.cache_capacity));
        info!(
            provider = provider.name(),
            dims = config.dimensions,
            cache_capacity = config.cache_capacity,
            max_attempts = retry.max_attempts,
            "ImageEmbedder initialized"
        );
        Self {
            provider,
            encoder: PayloadEncoder::new(config),
            retry,
            cache,
            dimensions: config.dimensions,
            jitter_min: Duration::from_millis(config.jitter_min_ms),
            jitter_max: Duration::from_millis(config.jitter_max_ms),
            sleeper: Arc::new(std::thread::sleep),
        }
    }

    /// Build from the `[embedding]` and `[retry]` sections.
    pub fn from_config(provider: Arc<dyn IEmbeddingProvider>, config: &LookalikeConfig) -> Self {
        Self::new(provider, &config.embedding, config.retry.policy())
    }

    /// Replace the sleep used for jitter and backoff.
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Bounds of the random delay before every provider call.
    pub fn with_jitter(mut self, min: Duration, max: Duration) -> Self {
        self.jitter_min = min;
        self.jitter_max = max.max(min);
        self
    }

    /// Extract a unit-norm embedding of `D` components from encoded image
    /// bytes (any format the `image` crate decodes).
    pub fn extract(&self, image_bytes: &[u8]) -> LookalikeResult<Vec<f32>> {
        let key = self.cache.as_ref().map(|_| content_key(image_bytes));
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key) {
                debug!(key = %key, "embedding cache hit");
                return Ok(hit);
            }
        }

        let span = embedding_span!(self.provider.name(), self.dimensions);
        let _guard = span.enter();

        let payload = self.encoder.encode(image_bytes)?;
        debug!(
            width = payload.width,
            height = payload.height,
            quality = payload.quality,
            bytes = payload.encoded_bytes,
            "payload encoded"
        );

        let mut call = |_attempt: u32| {
            (self.sleeper)(self.jitter());
            self.provider.embed_image(&payload)
        };
        let raw = self
            .retry
            .run_with_sleep(
                &mut call,
                |e: &LookalikeError| e.is_rate_limited(),
                |d| (self.sleeper)(d),
            )
            .map_err(|e| {
                if e.is_rate_limited() {
                    LookalikeError::from(EmbeddingError::RetriesExhausted {
                        attempts: self.retry.max_attempts.max(1),
                        message: e.to_string(),
                    })
                } else {
                    e
                }
            })?;

        normalize::validate_dimensions(&raw, self.dimensions)?;
        let vector = normalize::normalize(raw)?;

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, vector.clone());
        }
        Ok(vector)
    }

    /// Components of every extracted vector.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn jitter(&self) -> Duration {
        if self.jitter_max <= self.jitter_min {
            return self.jitter_min;
        }
        let ms = rand::thread_rng()
            .gen_range(self.jitter_min.as_millis() as u64..=self.jitter_max.as_millis() as u64);
        Duration::from_millis(ms)
    }
}
