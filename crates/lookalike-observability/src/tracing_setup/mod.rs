//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

use lookalike_core::config::ObservabilityConfig;
use lookalike_core::errors::{LookalikeError, LookalikeResult};

/// Filter from `RUST_LOG` when set, otherwise from `config.log_level`.
pub fn build_filter(config: &ObservabilityConfig) -> LookalikeResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|e| {
        LookalikeError::ConfigError(format!(
            "invalid observability.log_level {:?}: {e}",
            config.log_level
        ))
    })
}

/// Install the global subscriber. Fails if the filter is invalid or a
/// subscriber is already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> LookalikeResult<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    let result = if config.json {
        builder
            .json()
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| LookalikeError::ConfigError(format!("tracing init failed: {e}")))
}
