//! # Parallel Fetch Orchestrator
//!
//! Issues one concurrent invocation per eligible provider under
//! heterogeneous timeout budgets and collects whatever has settled by
//! the global deadline.
//!
//! Failures are data at this layer: every invocation outcome (success,
//! timeout, transport error, malformed or empty response, still pending
//! at the deadline) becomes a [`ProviderFetchResult`]; nothing
//! propagates out of [`FetchOrchestrator::fetch`] as an error.

use crate::application::services::normalizer::RateNormalizer;
use crate::domain::rate::UniversalRate;
use crate::domain::shipment::Shipment;
use crate::domain::value_objects::ProviderKey;
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::RateProvider;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, info, warn};

/// Fixed buffer added to the largest per-provider timeout to form the
/// default global deadline.
pub const DEADLINE_BUFFER_MS: u64 = 1000;

/// Progress notification emitted once per provider completion, failure,
/// or retry. Purely observational; never required for correctness.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A provider settled successfully.
    Completed {
        /// The provider key.
        provider: ProviderKey,
        /// Provider display name.
        carrier: String,
        /// Number of normalized rates produced.
        rates: usize,
    },
    /// A provider settled with a failure.
    Failed {
        /// The provider key.
        provider: ProviderKey,
        /// Provider display name.
        carrier: String,
        /// Stable failure classification tag.
        classification: &'static str,
        /// Human-readable error.
        message: String,
    },
    /// A provider invocation is being retried.
    Retrying {
        /// The provider key.
        provider: ProviderKey,
        /// The upcoming attempt number (1-based).
        attempt: u32,
    },
}

/// Observational callback for progress events.
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Tuning options for one fetch run.
#[derive(Clone)]
pub struct FetchOptions {
    /// Advisory cap on simultaneously in-flight invocations.
    pub max_concurrent: Option<usize>,
    /// Override for every provider's timeout budget, in milliseconds.
    pub individual_timeout_ms: Option<u64>,
    /// Once elapsed, stop waiting for stragglers if at least one
    /// provider has succeeded.
    pub min_results_timeout_ms: Option<u64>,
    /// Hard cap on total wait time; defaults to the largest provider
    /// budget plus [`DEADLINE_BUFFER_MS`].
    pub max_wait_time_ms: Option<u64>,
    /// Retries per provider after a retryable failure.
    pub retry_attempts: u32,
    /// Delay between retry attempts, in milliseconds.
    pub retry_delay_ms: u64,
    /// Whether failed fetch results appear in the returned detail list.
    pub include_failures: bool,
    /// Optional progress callback.
    pub progress: Option<ProgressCallback>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_concurrent: None,
            individual_timeout_ms: None,
            min_results_timeout_ms: None,
            max_wait_time_ms: None,
            retry_attempts: 0,
            retry_delay_ms: 250,
            include_failures: true,
            progress: None,
        }
    }
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("max_concurrent", &self.max_concurrent)
            .field("individual_timeout_ms", &self.individual_timeout_ms)
            .field("min_results_timeout_ms", &self.min_results_timeout_ms)
            .field("max_wait_time_ms", &self.max_wait_time_ms)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_ms", &self.retry_delay_ms)
            .field("include_failures", &self.include_failures)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl FetchOptions {
    /// Sets the hard cap on total wait time.
    #[must_use]
    pub fn with_max_wait_time(mut self, max_wait_time_ms: u64) -> Self {
        self.max_wait_time_ms = Some(max_wait_time_ms);
        self
    }

    /// Sets the per-provider timeout override.
    #[must_use]
    pub fn with_individual_timeout(mut self, timeout_ms: u64) -> Self {
        self.individual_timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the early-return threshold.
    #[must_use]
    pub fn with_min_results_timeout(mut self, timeout_ms: u64) -> Self {
        self.min_results_timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retries(mut self, attempts: u32, delay_ms: u64) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay_ms = delay_ms;
        self
    }

    /// Sets the advisory concurrency cap.
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = Some(max);
        self
    }

    /// Sets whether failed results appear in the detail list.
    #[must_use]
    pub fn with_include_failures(mut self, include: bool) -> Self {
        self.include_failures = include;
        self
    }

    /// Sets the progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }
}

/// Outcome of one provider invocation, immutable once settled.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderFetchResult {
    /// The provider key.
    pub provider: ProviderKey,
    /// Provider display name.
    pub provider_name: String,
    /// Provider ranking priority (lower sorts first on price ties).
    pub priority: u32,
    /// True when the provider produced at least one normalized rate.
    pub success: bool,
    /// Normalized rates (empty on failure).
    pub rates: Vec<UniversalRate>,
    /// Human-readable error on failure.
    pub error: Option<String>,
    /// Stable failure classification tag.
    pub classification: Option<&'static str>,
    /// Response latency in milliseconds.
    pub latency_ms: u64,
}

impl ProviderFetchResult {
    /// Creates a successful result.
    #[must_use]
    pub fn success(
        provider: ProviderKey,
        provider_name: impl Into<String>,
        priority: u32,
        rates: Vec<UniversalRate>,
        latency_ms: u64,
    ) -> Self {
        Self {
            provider,
            provider_name: provider_name.into(),
            priority,
            success: true,
            rates,
            error: None,
            classification: None,
            latency_ms,
        }
    }

    /// Creates a failed result from a provider error.
    #[must_use]
    pub fn failure(
        provider: ProviderKey,
        provider_name: impl Into<String>,
        priority: u32,
        error: &ProviderError,
        latency_ms: u64,
    ) -> Self {
        Self {
            provider,
            provider_name: provider_name.into(),
            priority,
            success: false,
            rates: Vec::new(),
            error: Some(error.to_string()),
            classification: Some(error.classification()),
            latency_ms,
        }
    }
}

impl fmt::Display for ProviderFetchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "{}: {} rates in {}ms",
                self.provider,
                self.rates.len(),
                self.latency_ms
            )
        } else {
            write!(
                f,
                "{}: failed ({}) in {}ms",
                self.provider,
                self.classification.unwrap_or("unknown"),
                self.latency_ms
            )
        }
    }
}

/// Orchestrates concurrent provider invocations under a global deadline.
#[derive(Debug, Clone)]
pub struct FetchOrchestrator {
    normalizer: RateNormalizer,
}

impl FetchOrchestrator {
    /// Creates a new orchestrator.
    #[must_use]
    pub fn new(normalizer: RateNormalizer) -> Self {
        Self { normalizer }
    }

    /// Returns the normalizer.
    #[inline]
    #[must_use]
    pub fn normalizer(&self) -> &RateNormalizer {
        &self.normalizer
    }

    /// Fetches rates from every given provider concurrently.
    ///
    /// The provider list is taken as-is; eligibility is the caller's
    /// concern (callers with extra domain knowledge supply their own
    /// list). Results come back in input order regardless of settle
    /// order. Never returns an error: every failure is a result row.
    pub async fn fetch(
        &self,
        shipment: &Shipment,
        providers: Vec<Arc<dyn RateProvider>>,
        options: &FetchOptions,
    ) -> Vec<ProviderFetchResult> {
        if providers.is_empty() {
            return Vec::new();
        }

        let max_budget_ms = providers
            .iter()
            .map(|p| {
                options
                    .individual_timeout_ms
                    .unwrap_or_else(|| p.descriptor().timeout_ms())
            })
            .max()
            .unwrap_or(DEADLINE_BUFFER_MS);
        let deadline_ms = options
            .max_wait_time_ms
            .unwrap_or(max_budget_ms + DEADLINE_BUFFER_MS);

        info!(
            providers = providers.len(),
            deadline_ms, "starting concurrent rate fetch"
        );

        let limiter = options
            .max_concurrent
            .map(|n| Arc::new(Semaphore::new(n.max(1))));

        let mut tasks: JoinSet<(usize, ProviderFetchResult)> = JoinSet::new();
        for (index, provider) in providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let normalizer = self.normalizer.clone();
            let shipment = shipment.clone();
            let budget_ms = options
                .individual_timeout_ms
                .unwrap_or_else(|| provider.descriptor().timeout_ms());
            let retry_attempts = options.retry_attempts;
            let retry_delay_ms = options.retry_delay_ms;
            let progress = options.progress.clone();
            let limiter = limiter.clone();

            tasks.spawn(async move {
                if let Some(limiter) = limiter {
                    // Advisory cap; a closed semaphore just means no cap.
                    let _permit = limiter.acquire_owned().await.ok();
                    let result = invoke_provider(
                        &normalizer,
                        provider.as_ref(),
                        &shipment,
                        budget_ms,
                        retry_attempts,
                        retry_delay_ms,
                        progress.as_ref(),
                    )
                    .await;
                    (index, result)
                } else {
                    let result = invoke_provider(
                        &normalizer,
                        provider.as_ref(),
                        &shipment,
                        budget_ms,
                        retry_attempts,
                        retry_delay_ms,
                        progress.as_ref(),
                    )
                    .await;
                    (index, result)
                }
            });
        }

        let started = Instant::now();
        let mut slots: Vec<Option<ProviderFetchResult>> = vec![None; providers.len()];

        let deadline = sleep(Duration::from_millis(deadline_ms));
        tokio::pin!(deadline);
        let min_results = sleep(Duration::from_millis(
            options.min_results_timeout_ms.unwrap_or(u64::MAX >> 16),
        ));
        tokio::pin!(min_results);
        let mut min_results_armed = options.min_results_timeout_ms.is_some();
        let mut min_window_elapsed = false;

        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok((index, result))) => {
                        let settled_ok = result.success;
                        if let Some(slot) = slots.get_mut(index) {
                            *slot = Some(result);
                        }
                        if settled_ok && min_window_elapsed {
                            debug!("first success after minimum-results window, returning early");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "provider task aborted unexpectedly");
                    }
                    None => break,
                },
                () = &mut deadline => {
                    warn!(deadline_ms, "global deadline reached with providers outstanding");
                    break;
                }
                () = &mut min_results, if min_results_armed => {
                    min_results_armed = false;
                    min_window_elapsed = true;
                    let have_success = slots
                        .iter()
                        .flatten()
                        .any(|r| r.success);
                    if have_success {
                        debug!("minimum-results window elapsed with results in hand");
                        break;
                    }
                }
            }
        }

        // Outstanding calls are excluded from further waiting; cancel
        // their underlying operations and record them as still pending.
        tasks.abort_all();
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let results: Vec<ProviderFetchResult> = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some(result) => result,
                None => {
                    let descriptor = providers
                        .get(index)
                        .map(|p| p.descriptor().clone());
                    let (key, name, priority) = descriptor
                        .map(|d| {
                            (d.key().clone(), d.display_name().to_string(), d.priority())
                        })
                        .unwrap_or_else(|| (ProviderKey::new("unknown"), String::new(), 0));
                    let error = ProviderError::still_pending(key.clone());
                    if let Some(progress) = &options.progress {
                        progress(ProgressEvent::Failed {
                            provider: key.clone(),
                            carrier: name.clone(),
                            classification: error.classification(),
                            message: error.to_string(),
                        });
                    }
                    ProviderFetchResult::failure(key, name, priority, &error, elapsed_ms)
                }
            })
            .collect();

        info!(
            settled = results.iter().filter(|r| r.success).count(),
            failed = results.iter().filter(|r| !r.success).count(),
            elapsed_ms,
            "rate fetch finished"
        );
        results
    }
}

/// Runs one provider's invocation with its timeout budget and bounded
/// local retries. Retries never extend the global deadline; the
/// collector simply stops listening when it fires.
async fn invoke_provider(
    normalizer: &RateNormalizer,
    provider: &dyn RateProvider,
    shipment: &Shipment,
    budget_ms: u64,
    retry_attempts: u32,
    retry_delay_ms: u64,
    progress: Option<&ProgressCallback>,
) -> ProviderFetchResult {
    let descriptor = provider.descriptor().clone();
    let key = descriptor.key().clone();
    let name = descriptor.display_name().to_string();
    let priority = descriptor.priority();
    let started = Instant::now();

    let mut attempt: u32 = 0;
    let error = loop {
        match invoke_once(normalizer, provider, shipment, budget_ms).await {
            Ok(rates) => {
                let latency_ms =
                    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                debug!(provider = %key, rates = rates.len(), latency_ms, "provider settled");
                if let Some(progress) = progress {
                    progress(ProgressEvent::Completed {
                        provider: key.clone(),
                        carrier: name.clone(),
                        rates: rates.len(),
                    });
                }
                return ProviderFetchResult::success(key, name, priority, rates, latency_ms);
            }
            Err(e) if e.is_retryable() && attempt < retry_attempts => {
                attempt += 1;
                warn!(provider = %key, attempt, error = %e, "retrying provider invocation");
                if let Some(progress) = progress {
                    progress(ProgressEvent::Retrying {
                        provider: key.clone(),
                        attempt,
                    });
                }
                sleep(Duration::from_millis(retry_delay_ms)).await;
            }
            Err(e) => break e,
        }
    };

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    warn!(provider = %key, error = %error, latency_ms, "provider invocation failed");
    if let Some(progress) = progress {
        progress(ProgressEvent::Failed {
            provider: key.clone(),
            carrier: name.clone(),
            classification: error.classification(),
            message: error.to_string(),
        });
    }
    ProviderFetchResult::failure(key, name, priority, &error, latency_ms)
}

/// One translate → invoke → normalize attempt.
async fn invoke_once(
    normalizer: &RateNormalizer,
    provider: &dyn RateProvider,
    shipment: &Shipment,
    budget_ms: u64,
) -> Result<Vec<UniversalRate>, ProviderError> {
    let descriptor = provider.descriptor();
    let key = descriptor.key().clone();

    let translator = normalizer
        .translators()
        .get(&key)
        .ok_or_else(|| ProviderError::invalid_request(format!("no translator for {key}")))?;
    let request = translator.to_request(shipment)?;

    let response = timeout(Duration::from_millis(budget_ms), provider.fetch_rates(&request))
        .await
        .map_err(|_| {
            ProviderError::timeout_with_duration(
                format!("no response within {budget_ms}ms"),
                budget_ms,
            )
        })??;

    if response.is_empty() {
        return Err(ProviderError::no_rates(key));
    }

    let (rates, dropped) = normalizer.normalize_all(descriptor, &response.rates);
    if rates.is_empty() {
        return Err(ProviderError::malformed_response(format!(
            "all {dropped} rate entries failed normalization"
        )));
    }
    if dropped > 0 {
        debug!(provider = %key, dropped, "dropped unparseable rate entries");
    }
    Ok(rates)
}
