//! # HTTP Rate Provider
//!
//! Stock [`RateProvider`] implementation for providers that expose a
//! JSON-over-HTTP quote endpoint: the translated payload is POSTed to
//! the configured URL and the response is expected to carry a `rates`
//! array in the provider's own shape.

use crate::domain::provider::ProviderDescriptor;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http_client::HttpClient;
use crate::infrastructure::providers::traits::{ProviderRequest, RateProvider, RawRateResponse};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Quote envelope returned by HTTP providers.
#[derive(Debug, Deserialize)]
struct QuoteEnvelope {
    #[serde(default)]
    rates: Vec<serde_json::Value>,
}

/// A rate provider reached over JSON HTTP.
#[derive(Debug)]
pub struct HttpRateProvider {
    descriptor: ProviderDescriptor,
    client: HttpClient,
    quote_url: String,
}

impl HttpRateProvider {
    /// Creates an HTTP provider from its descriptor and quote endpoint.
    ///
    /// The HTTP timeout is taken from the descriptor's timeout budget.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn new(descriptor: ProviderDescriptor, quote_url: impl Into<String>) -> ProviderResult<Self> {
        let client = HttpClient::new(descriptor.timeout_ms())?;
        Ok(Self {
            descriptor,
            client,
            quote_url: quote_url.into(),
        })
    }

    /// Creates an HTTP provider with default headers (API keys etc.).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be built.
    pub fn with_headers(
        descriptor: ProviderDescriptor,
        quote_url: impl Into<String>,
        headers: reqwest::header::HeaderMap,
    ) -> ProviderResult<Self> {
        let client = HttpClient::with_headers(descriptor.timeout_ms(), headers)?;
        Ok(Self {
            descriptor,
            client,
            quote_url: quote_url.into(),
        })
    }

    /// Returns the quote endpoint URL.
    #[inline]
    #[must_use]
    pub fn quote_url(&self) -> &str {
        &self.quote_url
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    async fn fetch_rates(&self, request: &ProviderRequest) -> ProviderResult<RawRateResponse> {
        debug!(
            provider = %self.descriptor.key(),
            url = %self.quote_url,
            "posting quote request"
        );
        let envelope: QuoteEnvelope = self.client.post(&self.quote_url, &request.payload).await?;
        if envelope.rates.is_empty() {
            return Err(ProviderError::no_rates(self.descriptor.key().clone()));
        }
        Ok(RawRateResponse::new(envelope.rates))
    }
}
