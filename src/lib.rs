//! # Rateshop
//!
//! A multi-provider shipping rate aggregation engine. One shipment goes
//! in; ranked, normalized rates from every eligible carrier system come
//! out, no matter how many of those systems were slow, down, or
//! misbehaving.
//!
//! ## Architecture
//!
//! The crate follows a layered architecture:
//!
//! - [`domain`]: shipments, provider descriptors, the universal rate
//!   schema, and the eligibility rules engine. No I/O.
//! - [`application`]: the fetch orchestrator, normalizer, aggregator,
//!   and the [`application::services::RateShopEngine`] facade.
//! - [`infrastructure`]: provider adapters (the invocation boundary
//!   and the stock HTTP adapter) and the TTL-cached provider registry.
//!
//! ## Example
//!
//! ```no_run
//! use rateshop::application::services::{FetchOptions, RateShopEngine};
//! use rateshop::domain::shipment::{Package, Shipment};
//! use rateshop::domain::value_objects::{Address, Dimensions, ShipmentClass, Weight};
//! use rateshop::infrastructure::registry::{InMemoryConfigStore, ProviderRegistry};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Arc::new(ProviderRegistry::new(
//!     vec![/* static provider descriptors */],
//!     Arc::new(InMemoryConfigStore::new()),
//! ));
//! let engine = RateShopEngine::builder(registry).build();
//!
//! let shipment = Shipment::builder(
//!     Address::new("US", "IL", "Chicago", "60601"),
//!     Address::new("CA", "ON", "Toronto", "M5V 2T6"),
//!     ShipmentClass::Freight,
//! )
//! .package(Package::new(Weight::from_lbs(500)?, Dimensions::from_inches(48, 40, 48)?))
//! .build()?;
//!
//! let result = engine.shop(&shipment, &FetchOptions::default()).await?;
//! for rate in &result.rates {
//!     println!("{} {}: {}", rate.display_carrier, rate.service.name, rate.pricing.total());
//! }
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use application::error::{EngineError, EngineResult};
pub use application::services::{AggregateResult, FetchOptions, RateShopEngine};
pub use config::EngineConfig;
