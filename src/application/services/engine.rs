//! # Rate Shopping Engine
//!
//! The facade callers interact with: snapshot the provider registry,
//! filter providers through eligibility, fan out concurrent fetches,
//! and aggregate whatever settles into one ranked result.

use crate::application::error::{EngineError, EngineResult};
use crate::application::services::aggregation::{AggregateResult, FetchSummary, aggregate};
use crate::application::services::normalizer::RateNormalizer;
use crate::application::services::orchestrator::{
    FetchOptions, FetchOrchestrator, ProviderFetchResult,
};
use crate::domain::eligibility::{EligibilityConfig, evaluate_all, select_eligible};
use crate::domain::provider::ProviderDescriptor;
use crate::domain::shipment::Shipment;
use crate::domain::value_objects::{ProviderKey, RequestId};
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::{RateProvider, Translator, TranslatorRegistry};
use crate::infrastructure::registry::ProviderRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The rate shopping engine.
///
/// Holds the provider registry (the source of descriptors), the adapter
/// map (the things that actually speak to carrier systems), and the
/// fetch machinery. Cheap to clone behind the internal `Arc`s.
#[derive(Debug, Clone)]
pub struct RateShopEngine {
    registry: Arc<ProviderRegistry>,
    eligibility: EligibilityConfig,
    adapters: HashMap<ProviderKey, Arc<dyn RateProvider>>,
    orchestrator: FetchOrchestrator,
}

impl RateShopEngine {
    /// Starts building an engine around a provider registry.
    #[must_use]
    pub fn builder(registry: Arc<ProviderRegistry>) -> RateShopEngineBuilder {
        RateShopEngineBuilder {
            registry,
            eligibility: EligibilityConfig::default(),
            translators: TranslatorRegistry::new(),
            adapters: HashMap::new(),
        }
    }

    /// Returns the eligibility configuration.
    #[inline]
    #[must_use]
    pub fn eligibility(&self) -> &EligibilityConfig {
        &self.eligibility
    }

    /// Shops rates for a shipment across all eligible providers.
    ///
    /// Partial provider failure is still success; zero rates overall
    /// comes back in-band as `success = false` with a composed error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoProvidersAvailable`] only when the
    /// merged registry holds no providers at all.
    #[instrument(skip(self, shipment, options), fields(class = %shipment.class()))]
    pub async fn shop(
        &self,
        shipment: &Shipment,
        options: &FetchOptions,
    ) -> EngineResult<AggregateResult> {
        let descriptors = self.registry.providers().await;
        if descriptors.is_empty() {
            return Err(EngineError::NoProvidersAvailable);
        }

        let eligible = select_eligible(shipment, &descriptors, &self.eligibility);
        if eligible.is_empty() {
            let message = exhaustion_message(shipment, &descriptors, &self.eligibility);
            warn!(candidates = descriptors.len(), "no eligible providers");
            return Ok(AggregateResult {
                request_id: RequestId::new_v4(),
                success: false,
                rates: Vec::new(),
                provider_results: Vec::new(),
                summary: FetchSummary::default(),
                error: Some(message),
            });
        }

        info!(
            eligible = eligible.len(),
            candidates = descriptors.len(),
            "shopping rates"
        );
        let results = self.fetch_for(shipment, &eligible, options).await;
        Ok(aggregate(results, options.include_failures))
    }

    /// Shops rates from an explicit provider list, skipping eligibility.
    ///
    /// The bypass path for callers that already know which providers
    /// they want.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownProvider`] when a key has no
    /// registered adapter.
    pub async fn shop_with_providers(
        &self,
        shipment: &Shipment,
        keys: &[ProviderKey],
        options: &FetchOptions,
    ) -> EngineResult<AggregateResult> {
        let mut providers: Vec<Arc<dyn RateProvider>> = Vec::with_capacity(keys.len());
        for key in keys {
            let adapter = self
                .adapters
                .get(key)
                .ok_or_else(|| EngineError::unknown_provider(key.as_str()))?;
            providers.push(Arc::clone(adapter));
        }

        let results = self.orchestrator.fetch(shipment, providers, options).await;
        Ok(aggregate(results, options.include_failures))
    }

    /// Fetches from the adapters behind the eligible descriptors.
    ///
    /// A descriptor without a registered adapter becomes a failed
    /// result row rather than aborting the whole run; dynamic registry
    /// entries can reference providers this process never wired up.
    async fn fetch_for(
        &self,
        shipment: &Shipment,
        eligible: &[ProviderDescriptor],
        options: &FetchOptions,
    ) -> Vec<ProviderFetchResult> {
        let mut providers: Vec<Arc<dyn RateProvider>> = Vec::new();
        let mut missing: Vec<ProviderFetchResult> = Vec::new();
        for descriptor in eligible {
            match self.adapters.get(descriptor.key()) {
                Some(adapter) => providers.push(Arc::clone(adapter)),
                None => {
                    warn!(provider = %descriptor.key(), "eligible provider has no adapter");
                    let error = ProviderError::internal("no adapter registered");
                    missing.push(ProviderFetchResult::failure(
                        descriptor.key().clone(),
                        descriptor.display_name(),
                        descriptor.priority(),
                        &error,
                        0,
                    ));
                }
            }
        }

        let mut results = self.orchestrator.fetch(shipment, providers, options).await;
        results.extend(missing);
        results
    }
}

/// Composes the in-band error for a run where eligibility rejected
/// every candidate.
fn exhaustion_message(
    shipment: &Shipment,
    descriptors: &[ProviderDescriptor],
    config: &EligibilityConfig,
) -> String {
    let verdicts = evaluate_all(shipment, descriptors, config);
    let details: Vec<String> = verdicts.iter().map(ToString::to_string).collect();
    format!(
        "no providers eligible for this shipment ({})",
        details.join("; ")
    )
}

/// Builder for [`RateShopEngine`].
#[derive(Debug)]
pub struct RateShopEngineBuilder {
    registry: Arc<ProviderRegistry>,
    eligibility: EligibilityConfig,
    translators: TranslatorRegistry,
    adapters: HashMap<ProviderKey, Arc<dyn RateProvider>>,
}

impl RateShopEngineBuilder {
    /// Sets the eligibility configuration.
    #[must_use]
    pub fn eligibility(mut self, config: EligibilityConfig) -> Self {
        self.eligibility = config;
        self
    }

    /// Registers a provider adapter, keyed by its descriptor.
    #[must_use]
    pub fn adapter(mut self, provider: Arc<dyn RateProvider>) -> Self {
        let key = provider.descriptor().key().clone();
        self.adapters.insert(key, provider);
        self
    }

    /// Registers a translator for a provider key.
    #[must_use]
    pub fn translator(self, key: impl Into<ProviderKey>, translator: Arc<dyn Translator>) -> Self {
        self.translators.register(key.into(), translator);
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> RateShopEngine {
        let normalizer = RateNormalizer::new(Arc::new(self.translators));
        RateShopEngine {
            registry: self.registry,
            eligibility: self.eligibility,
            adapters: self.adapters,
            orchestrator: FetchOrchestrator::new(normalizer),
        }
    }
}
