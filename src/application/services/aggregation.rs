//! # Rate Aggregation
//!
//! Merges per-provider fetch results into a single ranked quote set.
//! Rates sort ascending by landed total; price ties break on provider
//! priority, then on arrival order.

use crate::application::services::orchestrator::ProviderFetchResult;
use crate::domain::rate::UniversalRate;
use crate::domain::value_objects::{ProviderKey, RequestId};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Per-provider latency observation for the fetch summary.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderTiming {
    /// The provider key.
    pub provider: ProviderKey,
    /// Response latency in milliseconds.
    pub latency_ms: u64,
    /// Whether the provider produced rates.
    pub success: bool,
}

/// Roll-up statistics over one fetch run. Always reflects every
/// invoked provider, even when failed detail rows are elided.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchSummary {
    /// Providers invoked.
    pub total_providers: usize,
    /// Providers that produced at least one rate.
    pub successful_providers: usize,
    /// Providers that failed or were still pending.
    pub failed_providers: usize,
    /// Total rates across all successful providers.
    pub total_rates: usize,
    /// Per-provider latency observations, in invocation order.
    pub timings: Vec<ProviderTiming>,
    /// Fastest settled provider.
    pub fastest: Option<ProviderKey>,
    /// Slowest settled provider.
    pub slowest: Option<ProviderKey>,
}

impl FetchSummary {
    /// Builds a summary from the full (unfiltered) result set.
    #[must_use]
    pub fn from_results(results: &[ProviderFetchResult]) -> Self {
        let successful_providers = results.iter().filter(|r| r.success).count();
        let total_rates = results.iter().map(|r| r.rates.len()).sum();
        let timings: Vec<ProviderTiming> = results
            .iter()
            .map(|r| ProviderTiming {
                provider: r.provider.clone(),
                latency_ms: r.latency_ms,
                success: r.success,
            })
            .collect();
        let fastest = timings
            .iter()
            .min_by_key(|t| t.latency_ms)
            .map(|t| t.provider.clone());
        let slowest = timings
            .iter()
            .max_by_key(|t| t.latency_ms)
            .map(|t| t.provider.clone());
        Self {
            total_providers: results.len(),
            successful_providers,
            failed_providers: results.len() - successful_providers,
            total_rates,
            timings,
            fastest,
            slowest,
        }
    }
}

impl fmt::Display for FetchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} providers, {} rates",
            self.successful_providers, self.total_providers, self.total_rates
        )
    }
}

/// The engine's final answer for one shipment.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateResult {
    /// Engine-assigned identifier for this run, for log correlation.
    pub request_id: RequestId,
    /// True when at least one rate was produced.
    pub success: bool,
    /// Ranked rates, cheapest first.
    pub rates: Vec<UniversalRate>,
    /// Per-provider detail rows (failures elided when configured).
    pub provider_results: Vec<ProviderFetchResult>,
    /// Roll-up over every invoked provider.
    pub summary: FetchSummary,
    /// Composed error when no rates were produced.
    pub error: Option<String>,
}

impl AggregateResult {
    /// Returns the cheapest rate, if any.
    #[inline]
    #[must_use]
    pub fn best_rate(&self) -> Option<&UniversalRate> {
        self.rates.first()
    }
}

/// Merges fetch results into one ranked [`AggregateResult`].
///
/// Partial failure is success: as long as one provider produced rates
/// the result is successful and failures are detail rows. Only a fully
/// empty rate set flips `success` off and composes an error message
/// naming each provider's failure.
#[must_use]
pub fn aggregate(results: Vec<ProviderFetchResult>, include_failures: bool) -> AggregateResult {
    let request_id = RequestId::new_v4();
    let summary = FetchSummary::from_results(&results);

    let mut rates: Vec<(UniversalRate, u32)> = results
        .iter()
        .filter(|r| r.success)
        .flat_map(|r| r.rates.iter().cloned().map(|rate| (rate, r.priority)))
        .collect();
    // Stable sort: arrival order is the final tie-break for free.
    rates.sort_by(|(a, pa), (b, pb)| {
        a.pricing
            .total_amount()
            .cmp(&b.pricing.total_amount())
            .then(pa.cmp(pb))
    });
    let rates: Vec<UniversalRate> = rates.into_iter().map(|(rate, _)| rate).collect();

    let error = if rates.is_empty() {
        let composed = compose_failure_message(&results);
        warn!(
            request = %request_id,
            providers = results.len(),
            "aggregation produced no rates"
        );
        Some(composed)
    } else {
        debug!(request = %request_id, rates = rates.len(), %summary, "aggregation complete");
        None
    };
    let success = error.is_none();

    let provider_results = if include_failures {
        results
    } else {
        results.into_iter().filter(|r| r.success).collect()
    };

    AggregateResult {
        request_id,
        success,
        rates,
        provider_results,
        summary,
        error,
    }
}

fn compose_failure_message(results: &[ProviderFetchResult]) -> String {
    if results.is_empty() {
        return "no providers were invoked".to_string();
    }
    let details: Vec<String> = results
        .iter()
        .map(|r| {
            let reason = r.error.as_deref().unwrap_or("no rates returned");
            format!("{}: {reason}", r.provider)
        })
        .collect();
    format!("no rates available ({})", details.join("; "))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::rate::{PriceBreakdown, RateSource, ServiceDescriptor};
    use crate::domain::value_objects::{Currency, Money, TransportMode};
    use crate::infrastructure::providers::error::ProviderError;
    use rust_decimal::Decimal;

    fn rate(provider: &str, total: i64) -> UniversalRate {
        UniversalRate::new(
            RateSource::new(provider, provider, "test"),
            ServiceDescriptor::new("Standard", TransportMode::Ltl),
            PriceBreakdown::from_total(
                Money::new(Decimal::from(total), Currency::Usd).unwrap(),
            ),
        )
    }

    fn success(provider: &str, priority: u32, totals: &[i64], latency_ms: u64) -> ProviderFetchResult {
        ProviderFetchResult::success(
            ProviderKey::new(provider),
            provider,
            priority,
            totals.iter().map(|t| rate(provider, *t)).collect(),
            latency_ms,
        )
    }

    fn failure(provider: &str, error: &ProviderError, latency_ms: u64) -> ProviderFetchResult {
        ProviderFetchResult::failure(ProviderKey::new(provider), provider, 100, error, latency_ms)
    }

    #[test]
    fn rates_sorted_ascending_by_total() {
        let result = aggregate(
            vec![
                success("a", 100, &[120, 80], 50),
                success("b", 100, &[95, 200], 70),
            ],
            true,
        );

        assert!(result.success);
        let totals: Vec<Decimal> = result
            .rates
            .iter()
            .map(|r| r.pricing.total_amount())
            .collect();
        assert_eq!(
            totals,
            vec![
                Decimal::from(80),
                Decimal::from(95),
                Decimal::from(120),
                Decimal::from(200)
            ]
        );
        assert_eq!(result.best_rate().unwrap().source.key.as_str(), "a");
    }

    #[test]
    fn price_ties_break_on_provider_priority() {
        let result = aggregate(
            vec![
                success("later_but_preferred", 10, &[100], 50),
                success("earlier_but_deprioritized", 200, &[100], 40),
            ],
            true,
        );

        // "later_but_preferred" arrived second in the result list but
        // carries the lower priority value, so it wins the tie.
        assert_eq!(
            result.rates.first().unwrap().source.key.as_str(),
            "later_but_preferred"
        );
    }

    #[test]
    fn equal_priority_ties_preserve_arrival_order() {
        let result = aggregate(
            vec![success("first", 100, &[100], 10), success("second", 100, &[100], 20)],
            true,
        );
        assert_eq!(result.rates.first().unwrap().source.key.as_str(), "first");
    }

    #[test]
    fn partial_failure_is_success() {
        let result = aggregate(
            vec![
                failure("down", &ProviderError::connection("refused"), 30),
                success("up", 100, &[50], 40),
            ],
            true,
        );

        assert!(result.success);
        assert!(result.error.is_none());
        assert_eq!(result.rates.len(), 1);
        assert_eq!(result.summary.failed_providers, 1);
        assert_eq!(result.summary.successful_providers, 1);
    }

    #[test]
    fn zero_rates_composes_error_from_all_failures() {
        let result = aggregate(
            vec![
                failure("a", &ProviderError::timeout("no response within 500ms"), 500),
                failure("b", &ProviderError::authentication("bad key"), 20),
            ],
            true,
        );

        assert!(!result.success);
        assert!(result.rates.is_empty());
        let error = result.error.unwrap();
        assert!(error.contains("a:"));
        assert!(error.contains("b:"));
        assert!(error.contains("no rates available"));
    }

    #[test]
    fn include_failures_false_elides_detail_rows_but_not_summary() {
        let result = aggregate(
            vec![
                failure("down", &ProviderError::connection("refused"), 30),
                success("up", 100, &[50], 40),
            ],
            false,
        );

        assert_eq!(result.provider_results.len(), 1);
        assert!(result.provider_results.first().unwrap().success);
        assert_eq!(result.summary.total_providers, 2);
        assert_eq!(result.summary.failed_providers, 1);
    }

    #[test]
    fn summary_tracks_fastest_and_slowest() {
        let result = aggregate(
            vec![success("quick", 100, &[10], 25), success("slow", 100, &[20], 900)],
            true,
        );

        assert_eq!(result.summary.fastest.as_ref().unwrap().as_str(), "quick");
        assert_eq!(result.summary.slowest.as_ref().unwrap().as_str(), "slow");
        assert_eq!(result.summary.total_rates, 2);
    }

    #[test]
    fn each_run_gets_its_own_request_id() {
        let first = aggregate(vec![success("a", 100, &[10], 5)], true);
        let second = aggregate(vec![success("a", 100, &[10], 5)], true);
        assert_ne!(first.request_id, second.request_id);
    }

    #[test]
    fn empty_input_yields_failed_result() {
        let result = aggregate(Vec::new(), true);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("no providers were invoked"));
    }
}
