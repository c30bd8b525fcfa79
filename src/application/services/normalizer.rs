//! # Response Normalizer
//!
//! Converts raw provider rate entries into [`UniversalRate`]s.
//!
//! The provider-specific translator does the field mapping; the
//! normalizer's own job is provenance: `source` is overwritten with the
//! invoking provider's identity unconditionally, whatever the
//! translator produced. Display carrier fields are left alone so
//! reseller scenarios survive. A translator failure drops that single
//! rate (logged, not fatal) without affecting the provider's other
//! rates.

use crate::domain::provider::ProviderDescriptor;
use crate::domain::rate::{RateSource, UniversalRate};
use crate::infrastructure::providers::traits::TranslatorRegistry;
use std::sync::Arc;
use tracing::warn;

/// Normalizes raw provider rates into the universal schema.
#[derive(Debug, Clone)]
pub struct RateNormalizer {
    translators: Arc<TranslatorRegistry>,
}

impl RateNormalizer {
    /// Creates a normalizer over a translator registry.
    #[must_use]
    pub fn new(translators: Arc<TranslatorRegistry>) -> Self {
        Self { translators }
    }

    /// Returns the translator registry.
    #[inline]
    #[must_use]
    pub fn translators(&self) -> &Arc<TranslatorRegistry> {
        &self.translators
    }

    /// Normalizes one raw rate entry.
    ///
    /// Returns `None` when the provider has no registered translator or
    /// the translator rejects the entry; the caller counts the drop.
    #[must_use]
    pub fn normalize(
        &self,
        provider: &ProviderDescriptor,
        raw: &serde_json::Value,
    ) -> Option<UniversalRate> {
        let Some(translator) = self.translators.get(provider.key()) else {
            warn!(provider = %provider.key(), "no translator registered, dropping rate");
            return None;
        };

        match translator.from_rate(raw) {
            Ok(mut rate) => {
                // Provenance is the engine's to assert, not the translator's.
                rate.source = RateSource::new(
                    provider.key().clone(),
                    provider.display_name(),
                    provider.system(),
                );
                if rate.raw.is_none() {
                    rate.raw = Some(raw.clone());
                }
                Some(rate)
            }
            Err(e) => {
                warn!(provider = %provider.key(), error = %e, "translator rejected rate entry");
                None
            }
        }
    }

    /// Normalizes a batch of raw entries, returning the surviving rates
    /// and the number dropped.
    #[must_use]
    pub fn normalize_all(
        &self,
        provider: &ProviderDescriptor,
        raws: &[serde_json::Value],
    ) -> (Vec<UniversalRate>, usize) {
        let rates: Vec<UniversalRate> = raws
            .iter()
            .filter_map(|raw| self.normalize(provider, raw))
            .collect();
        let dropped = raws.len() - rates.len();
        (rates, dropped)
    }
}
