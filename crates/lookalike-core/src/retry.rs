//! Reusable retry policy for remote calls.
//!
//! `max_attempts` counts the first call. The delay before retry `n`
//! (0-based) is `base_delay * backoff_multiplier^n`, so the defaults give
//! 5s then 10s between three attempts.

use std::time::Duration;

use tracing::warn;

/// Exponential-backoff retry policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        crate::config::RetryConfig::default().policy()
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Delay to wait before the given 0-based retry.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(retry as i32);
        self.base_delay.mul_f64(factor)
    }

    /// Run `op` until it succeeds, fails with an error `is_retryable`
    /// rejects, or attempts run out. `op` receives the 1-based attempt.
    ///
    /// On exhaustion the last error is returned unchanged; callers that
    /// need to distinguish exhaustion compare the attempt count.
    pub fn run<T, E, F, R>(&self, mut op: F, is_retryable: R) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        R: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        self.run_with_sleep(&mut op, is_retryable, std::thread::sleep)
    }

    /// Same as [`run`](Self::run) with an injectable sleep.
    pub fn run_with_sleep<T, E, F, R, S>(
        &self,
        op: &mut F,
        is_retryable: R,
        sleep: S,
    ) -> Result<T, E>
    where
        F: FnMut(u32) -> Result<T, E>,
        R: Fn(&E) -> bool,
        S: Fn(Duration),
        E: std::fmt::Display,
    {
        let max = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max && is_retryable(&e) => {
                    let delay = self.delay_for(attempt - 1);
                    warn!(
                        attempt,
                        max_attempts = max,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retryable failure, backing off"
                    );
                    sleep(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
