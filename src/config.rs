//! # Engine Configuration
//!
//! Layered configuration: documented defaults, overridden by an
//! optional `rateshop.toml`, overridden by `RATESHOP_*` environment
//! variables.

use crate::application::error::{EngineError, EngineResult};
use crate::application::services::orchestrator::FetchOptions;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Engine-wide tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// How long a dynamic provider snapshot stays fresh.
    pub registry_ttl_secs: u64,
    /// Timeout budget for providers that do not declare their own.
    pub default_timeout_ms: u64,
    /// Buffer added to the largest provider budget to form the global
    /// deadline.
    pub deadline_buffer_ms: u64,
    /// Retries per provider after a retryable failure.
    pub retry_attempts: u32,
    /// Delay between retry attempts, in milliseconds.
    pub retry_delay_ms: u64,
    /// Whether failed fetch results appear in result detail lists.
    pub include_failures: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            registry_ttl_secs: 30,
            default_timeout_ms: 5000,
            deadline_buffer_ms: 1000,
            retry_attempts: 0,
            retry_delay_ms: 250,
            include_failures: true,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `rateshop.toml` (optional) and
    /// `RATESHOP_*` environment variables, on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Configuration`] when a source is present
    /// but malformed.
    pub fn load() -> EngineResult<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("rateshop").required(false))
            .add_source(Environment::with_prefix("RATESHOP"))
            .build()
            .map_err(|e| EngineError::configuration(e.to_string()))?;
        settings
            .try_deserialize()
            .map_err(|e| EngineError::configuration(e.to_string()))
    }

    /// Returns the registry TTL as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn registry_ttl(&self) -> Duration {
        Duration::from_secs(self.registry_ttl_secs)
    }

    /// Converts the fetch-related knobs into per-run [`FetchOptions`].
    #[must_use]
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            retry_attempts: self.retry_attempts,
            retry_delay_ms: self.retry_delay_ms,
            include_failures: self.include_failures,
            ..FetchOptions::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.registry_ttl_secs, 30);
        assert_eq!(config.default_timeout_ms, 5000);
        assert_eq!(config.deadline_buffer_ms, 1000);
        assert_eq!(config.retry_attempts, 0);
        assert_eq!(config.retry_delay_ms, 250);
        assert!(config.include_failures);
    }

    #[test]
    fn fetch_options_carry_retry_policy() {
        let config = EngineConfig {
            retry_attempts: 2,
            retry_delay_ms: 100,
            include_failures: false,
            ..EngineConfig::default()
        };
        let options = config.fetch_options();
        assert_eq!(options.retry_attempts, 2);
        assert_eq!(options.retry_delay_ms, 100);
        assert!(!options.include_failures);
    }

    #[test]
    fn partial_source_keeps_remaining_defaults() {
        let config: EngineConfig =
            serde_json::from_value(serde_json::json!({"retry_attempts": 3})).unwrap();
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.registry_ttl_secs, 30);
    }
}
