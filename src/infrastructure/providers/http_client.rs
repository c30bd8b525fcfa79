//! # HTTP Client Utilities
//!
//! Shared HTTP client wrapper for transport-backed provider adapters.
//!
//! Provides timeout configuration, JSON serialization, and mapping of
//! transport and status-code failures into [`ProviderError`] variants.
//!
//! # Examples
//!
//! ```ignore
//! use rateshop::infrastructure::providers::http_client::HttpClient;
//!
//! let client = HttpClient::new(5000)?;
//! let response: MyEnvelope = client.post("https://api.example.com/quotes", &body).await?;
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client wrapper for provider adapters.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Creates a new HTTP client with default headers (API keys etc.).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be created.
    pub fn with_headers(
        timeout_ms: u64,
        default_headers: reqwest::header::HeaderMap,
    ) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                ProviderError::internal(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Connection`/`Timeout` if the request fails,
    /// or `ProviderError::MalformedResponse` if the body cannot be parsed.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> ProviderResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }

    /// Makes a POST request with a JSON body and deserializes the response.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Connection`/`Timeout` if the request fails,
    /// or `ProviderError::MalformedResponse` if the body cannot be parsed.
    pub async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }

    /// Makes a simple health check GET request.
    ///
    /// Returns `true` if the request succeeds with a 2xx status code.
    pub async fn health_check(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

/// Handles the HTTP response, checking status and deserializing JSON.
async fn handle_response<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
    let status = response.status();

    if status.is_success() {
        response.json::<T>().await.map_err(|e| {
            ProviderError::malformed_response(format!("failed to parse response: {}", e))
        })
    } else {
        let error_body = response.text().await.unwrap_or_default();
        Err(map_status_error(status, &error_body))
    }
}

/// Maps a reqwest error to a ProviderError.
fn map_reqwest_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::timeout("request timed out")
    } else if error.is_connect() {
        ProviderError::connection(format!("connection failed: {}", error))
    } else {
        ProviderError::connection(format!("HTTP request failed: {}", error))
    }
}

/// Maps an HTTP status code to a ProviderError.
fn map_status_error(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::BAD_REQUEST => {
            ProviderError::invalid_request(format!("bad request: {}", body))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::authentication(format!("authentication failed: {}", body))
        }
        StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited("rate limit exceeded"),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::connection(format!("server error ({}): {}", status, body))
        }
        _ => ProviderError::malformed_response(format!("HTTP error ({}): {}", status, body)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Envelope {
        rates: Vec<serde_json::Value>,
    }

    #[test]
    fn new_client() {
        let client = HttpClient::new(5000);
        assert!(client.is_ok());
        assert_eq!(client.unwrap().timeout_ms(), 5000);
    }

    #[test]
    fn with_headers() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("X-Api-Key", "secret".parse().unwrap());
        let client = HttpClient::with_headers(3000, headers);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn post_parses_json_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quotes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"rates": [{"total": 100.0}]})),
            )
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let envelope: Envelope = client
            .post(&format!("{}/quotes", server.uri()), &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(envelope.rates.len(), 1);
    }

    #[tokio::test]
    async fn server_error_maps_to_connection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quotes"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let result: ProviderResult<Envelope> = client
            .post(&format!("{}/quotes", server.uri()), &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(ProviderError::Connection { .. })));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_authentication() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/quotes"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        let result: ProviderResult<Envelope> = client
            .post(&format!("{}/quotes", server.uri()), &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(ProviderError::Authentication { .. })));
    }

    #[tokio::test]
    async fn health_check_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpClient::new(2000).unwrap();
        assert!(client.health_check(&format!("{}/health", server.uri())).await);
    }
}
