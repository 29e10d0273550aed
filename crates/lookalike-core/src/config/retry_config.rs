use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::retry::RetryPolicy;

/// Retry policy for remote calls, in config form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: defaults::DEFAULT_BASE_DELAY_MS,
            backoff_multiplier: defaults::DEFAULT_BACKOFF_MULTIPLIER,
        }
    }
}
