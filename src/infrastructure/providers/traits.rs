//! # Provider Ports
//!
//! Port definitions for provider integrations.
//!
//! [`RateProvider`] is the abstract "invoke provider" capability handed
//! to the orchestrator; the engine performs no transport itself.
//! [`Translator`] converts between the universal shipment shape and a
//! provider's wire format, dispatched per provider through a
//! [`TranslatorRegistry`].
//!
//! # Examples
//!
//! ```ignore
//! use rateshop::infrastructure::providers::traits::{RateProvider, Translator};
//!
//! struct MyProvider { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl RateProvider for MyProvider {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::provider::ProviderDescriptor;
use crate::domain::rate::UniversalRate;
use crate::domain::shipment::Shipment;
use crate::domain::value_objects::ProviderKey;
use crate::infrastructure::providers::error::ProviderResult;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A provider-specific request, produced by a [`Translator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The target provider.
    pub provider: ProviderKey,
    /// The translated wire payload.
    pub payload: serde_json::Value,
}

impl ProviderRequest {
    /// Creates a new provider request.
    #[must_use]
    pub fn new(provider: ProviderKey, payload: serde_json::Value) -> Self {
        Self { provider, payload }
    }
}

/// A provider's raw rate envelope: zero or more untyped rate entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRateResponse {
    /// Raw rate entries in the provider's own shape.
    pub rates: Vec<serde_json::Value>,
}

impl RawRateResponse {
    /// Creates a response from raw entries.
    #[must_use]
    pub fn new(rates: Vec<serde_json::Value>) -> Self {
        Self { rates }
    }

    /// Returns true if the provider returned no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Trait defining the invocation boundary for rate providers.
///
/// Implementations own their transport (HTTP, queue, in-process mock);
/// the orchestrator only requires that `fetch_rates` eventually settles
/// or is cut off by its timeout budget.
#[async_trait]
pub trait RateProvider: Send + Sync + fmt::Debug {
    /// Returns the provider's capability descriptor.
    fn descriptor(&self) -> &ProviderDescriptor;

    /// Invokes the provider with a translated request.
    ///
    /// # Errors
    ///
    /// - `ProviderError::Timeout` - the backend did not answer in time
    /// - `ProviderError::Connection` - transport failure
    /// - `ProviderError::MalformedResponse` - unparseable response
    async fn fetch_rates(&self, request: &ProviderRequest) -> ProviderResult<RawRateResponse>;
}

/// Trait for per-provider request/response translation.
///
/// Translator internals (field mapping) are external collaborators;
/// the engine only depends on this interface.
pub trait Translator: Send + Sync + fmt::Debug {
    /// Converts the universal shipment shape into the provider wire format.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidRequest` when the shipment cannot
    /// be expressed in the provider's format.
    fn to_request(&self, shipment: &Shipment) -> ProviderResult<ProviderRequest>;

    /// Converts one raw rate entry into the universal rate schema.
    ///
    /// The normalizer overwrites `source` provenance afterwards, so a
    /// translator need not (and cannot usefully) populate it.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MalformedResponse` when the entry cannot
    /// be converted.
    fn from_rate(&self, raw: &serde_json::Value) -> ProviderResult<UniversalRate>;
}

/// Registry of translators keyed by provider identity.
#[derive(Debug, Default)]
pub struct TranslatorRegistry {
    translators: DashMap<ProviderKey, Arc<dyn Translator>>,
}

impl TranslatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a translator for a provider, replacing any previous one.
    pub fn register(&self, provider: ProviderKey, translator: Arc<dyn Translator>) {
        self.translators.insert(provider, translator);
    }

    /// Returns the translator for a provider, if registered.
    #[must_use]
    pub fn get(&self, provider: &ProviderKey) -> Option<Arc<dyn Translator>> {
        self.translators.get(provider).map(|entry| entry.clone())
    }

    /// Returns the number of registered translators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.translators.len()
    }

    /// Returns true if no translators are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translators.is_empty()
    }
}
