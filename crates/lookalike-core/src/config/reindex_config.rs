use serde::{Deserialize, Serialize};

use super::defaults;

/// Bulk reindex configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReindexConfig {
    /// Root directory product images are resolved against.
    pub image_root: String,
    /// Bound of the progress channel used by the async adapter.
    pub channel_capacity: usize,
}

impl Default for ReindexConfig {
    fn default() -> Self {
        Self {
            image_root: defaults::DEFAULT_IMAGE_ROOT.to_string(),
            channel_capacity: defaults::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
