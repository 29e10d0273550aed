//! Default values for every configuration field.

// Storage
pub const DEFAULT_DB_PATH: &str = "lookalike.db";
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// Embedding
pub const DEFAULT_EMBEDDING_ENDPOINT: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/embeddings/multimodal-embedding/multimodal-embedding";
pub const DEFAULT_EMBEDDING_MODEL: &str = "multimodal-embedding-v1";
pub const DEFAULT_API_KEY_ENV: &str = "DASHSCOPE_API_KEY";
pub const DEFAULT_DIMENSIONS: usize = crate::constants::EMBEDDING_DIMENSIONS;
/// 2.5 MB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 2_621_440;
pub const DEFAULT_INITIAL_QUALITY: u8 = 95;
pub const DEFAULT_QUALITY_STEP: u8 = 5;
pub const DEFAULT_MIN_QUALITY: u8 = 50;
pub const DEFAULT_DOWNSCALE_SAFETY: f64 = 0.9;
pub const DEFAULT_JITTER_MIN_MS: u64 = 100;
pub const DEFAULT_JITTER_MAX_MS: u64 = 600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

// Retry
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 5_000;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

// Search
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_MAX_TOP_K: usize = 100;

// Reindex
pub const DEFAULT_IMAGE_ROOT: &str = "uploads";
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

// Observability
pub const DEFAULT_LOG_LEVEL: &str = "info";
