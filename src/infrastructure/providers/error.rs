//! # Provider Errors
//!
//! Error types for provider invocation and translation.
//!
//! Failures at this boundary are data, not exceptions: the orchestrator
//! converts every error into a failed fetch result and keeps going.
//! [`ProviderError::classification`] yields the stable tag recorded in
//! those results.
//!
//! # Examples
//!
//! ```
//! use rateshop::infrastructure::providers::error::ProviderError;
//!
//! let error = ProviderError::timeout_with_duration("no response", 5000);
//! assert!(error.is_retryable());
//! assert_eq!(error.classification(), "timeout");
//!
//! let error = ProviderError::malformed_response("missing rates array");
//! assert!(!error.is_retryable());
//! ```

use crate::domain::value_objects::ProviderKey;
use thiserror::Error;

/// Error type for provider invocation operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Invocation timed out.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout budget in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Authentication or authorization failure.
    #[error("provider authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("provider rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
    },

    /// Invalid or untranslatable request.
    #[error("provider invalid request: {message}")]
    InvalidRequest {
        /// Error message.
        message: String,
    },

    /// Response could not be parsed into the expected shape.
    #[error("provider malformed response: {message}")]
    MalformedResponse {
        /// Error message.
        message: String,
    },

    /// Provider answered with zero rates.
    #[error("provider returned no rates: {provider}")]
    NoRates {
        /// The provider key.
        provider: ProviderKey,
    },

    /// Invocation was still outstanding at the global deadline.
    #[error("provider still pending at deadline: {provider}")]
    StillPending {
        /// The provider key.
        provider: ProviderKey,
    },

    /// Internal provider adapter error.
    #[error("provider internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with the budget that elapsed.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
        }
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a malformed response error.
    #[must_use]
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates a zero-rate response error.
    #[must_use]
    pub fn no_rates(provider: ProviderKey) -> Self {
        Self::NoRates { provider }
    }

    /// Creates a still-pending error for a call outstanding at the deadline.
    #[must_use]
    pub fn still_pending(provider: ProviderKey) -> Self {
        Self::StillPending { provider }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns the stable classification tag recorded in fetch results.
    #[must_use]
    pub fn classification(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::Connection { .. } => "transport",
            Self::Authentication { .. } => "authentication",
            Self::RateLimited { .. } => "rate_limited",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::MalformedResponse { .. } => "malformed",
            Self::NoRates { .. } => "empty",
            Self::StillPending { .. } => "still_pending",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_retryable() {
        let error = ProviderError::timeout("test");
        assert!(error.is_retryable());
        assert_eq!(error.classification(), "timeout");
    }

    #[test]
    fn connection_is_retryable() {
        let error = ProviderError::connection("test");
        assert!(error.is_retryable());
        assert_eq!(error.classification(), "transport");
    }

    #[test]
    fn malformed_is_not_retryable() {
        let error = ProviderError::malformed_response("bad json");
        assert!(!error.is_retryable());
        assert_eq!(error.classification(), "malformed");
    }

    #[test]
    fn no_rates_classification() {
        let error = ProviderError::no_rates(ProviderKey::new("fast"));
        assert!(!error.is_retryable());
        assert_eq!(error.classification(), "empty");
        assert!(error.to_string().contains("fast"));
    }

    #[test]
    fn still_pending_classification() {
        let error = ProviderError::still_pending(ProviderKey::new("slow"));
        assert_eq!(error.classification(), "still_pending");
    }

    #[test]
    fn display_format() {
        let error = ProviderError::timeout_with_duration("no response after budget", 5000);
        let display = error.to_string();
        assert!(display.contains("timeout"));
        assert!(display.contains("no response after budget"));
    }
}
