//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Per-provider failures are data carried inside fetch results, not
//! errors; only conditions that prevent the engine from running at all
//! surface here.

use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The merged registry yielded no providers at all.
    #[error("no providers available: registry is empty")]
    NoProvidersAvailable,

    /// A caller-supplied provider key has no registered adapter.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// Engine configuration could not be loaded.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an unknown-provider error.
    #[must_use]
    pub fn unknown_provider(key: impl Into<String>) -> Self {
        Self::UnknownProvider(key.into())
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert!(
            EngineError::NoProvidersAvailable
                .to_string()
                .contains("no providers")
        );
        assert!(
            EngineError::unknown_provider("ghost")
                .to_string()
                .contains("ghost")
        );
        assert!(
            EngineError::configuration("bad ttl")
                .to_string()
                .contains("bad ttl")
        );
    }
}
