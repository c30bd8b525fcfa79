//! # Provider Integrations
//!
//! The invocation boundary ([`traits::RateProvider`]), per-provider
//! translation ([`traits::Translator`]), the error taxonomy, and the
//! stock JSON-over-HTTP adapter.

pub mod error;
pub mod http_client;
pub mod http_provider;
pub mod traits;

pub use error::{ProviderError, ProviderResult};
pub use http_provider::HttpRateProvider;
pub use traits::{ProviderRequest, RateProvider, RawRateResponse, Translator, TranslatorRegistry};
