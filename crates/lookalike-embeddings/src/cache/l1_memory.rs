//! In-memory cache of extracted vectors using moka.
//!
//! Keys are blake3 hashes of the raw image bytes, so identical uploads
//! share one entry regardless of file name.

use std::time::Duration;

use moka::sync::Cache;

/// Bounded vector cache keyed by [`content_key`]. Idle entries expire
/// after an hour.
pub struct VectorCache {
    cache: Cache<String, Vec<f32>>,
}

/// Hex blake3 hash of the raw image bytes.
pub fn content_key(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

impl VectorCache {
    /// Create a cache holding at most `max_entries` vectors.
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(Duration::from_secs(3600))
            .build();
        Self { cache }
    }

    /// Get a vector by content key.
    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    /// Insert a vector under its content key.
    pub fn insert(&self, key: String, vector: Vec<f32>) {
        self.cache.insert(key, vector);
    }

    /// Number of cached vectors.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached vector.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
