//! # Provider Configuration Store
//!
//! The read boundary for dynamically configured providers.
//!
//! The backing store holds richer rule structures (routing tables,
//! weight/dimension restriction rows, per-service support flags) than
//! the engine needs; [`DynamicProviderRecord::project`] flattens them
//! into the same [`ProviderDescriptor`] shape used for static entries
//! so downstream logic is provider-origin-agnostic.

use crate::domain::provider::{
    DEFAULT_PROVIDER_TIMEOUT_MS, GeoMatch, ProviderDescriptor, RouteRule,
};
use crate::domain::value_objects::{
    Dimensions, ProviderOrigin, ShipmentClass, WeightRange,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for backing-store reads.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("configuration store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be interpreted.
    #[error("malformed provider record: {0}")]
    Malformed(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// One routing-table row from the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRow {
    /// Origin country (any alias form).
    pub origin_country: String,
    /// Optional origin region.
    pub origin_region: Option<String>,
    /// Optional origin city.
    pub origin_city: Option<String>,
    /// Destination country (any alias form).
    pub destination_country: String,
    /// Optional destination region.
    pub destination_region: Option<String>,
    /// Optional destination city.
    pub destination_city: Option<String>,
}

impl RoutingRow {
    fn to_rule(&self) -> RouteRule {
        let mut origin = GeoMatch::country(&self.origin_country);
        if let Some(region) = &self.origin_region {
            origin = origin.with_region(region);
        }
        if let Some(city) = &self.origin_city {
            origin = origin.with_city(city);
        }
        let mut destination = GeoMatch::country(&self.destination_country);
        if let Some(region) = &self.destination_region {
            destination = destination.with_region(region);
        }
        if let Some(city) = &self.destination_city {
            destination = destination.with_city(city);
        }
        RouteRule::new(origin, destination)
    }
}

/// One weight/dimension restriction row from the backing store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionRow {
    /// Total-shipment weight bounds.
    pub total_weight: Option<WeightRange>,
    /// Per-unit (e.g. per-pallet) weight bounds.
    pub per_unit_weight: Option<WeightRange>,
    /// Maximum package dimensions.
    pub max_dimensions: Option<Dimensions>,
}

/// A dynamically configured provider as stored, pre-projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicProviderRecord {
    /// Provider key.
    pub key: String,
    /// Display name.
    pub display_name: String,
    /// Backend system tag.
    pub system: String,
    /// Supported shipment classes.
    pub classes: Vec<ShipmentClass>,
    /// Domestic route support flag.
    pub domestic: bool,
    /// International route support flag.
    pub international: bool,
    /// Routing table rows (empty = unrestricted).
    pub routing: Vec<RoutingRow>,
    /// Weight and dimension restrictions.
    pub restrictions: RestrictionRow,
    /// Timeout budget in milliseconds (0 = engine default).
    pub timeout_ms: u64,
    /// Priority rank.
    pub priority: u32,
}

impl DynamicProviderRecord {
    /// Projects the stored record into the uniform descriptor shape.
    #[must_use]
    pub fn project(&self) -> ProviderDescriptor {
        let mut builder = ProviderDescriptor::builder(self.key.as_str(), &self.display_name)
            .system(&self.system)
            .route_support(self.domestic, self.international)
            .timeout_ms(if self.timeout_ms == 0 {
                DEFAULT_PROVIDER_TIMEOUT_MS
            } else {
                self.timeout_ms
            })
            .priority(self.priority)
            .origin(ProviderOrigin::Dynamic);

        for class in &self.classes {
            builder = builder.supports_class(*class);
        }
        for row in &self.routing {
            builder = builder.route_rule(row.to_rule());
        }
        if let Some(range) = self.restrictions.total_weight {
            builder = builder.weight_limit(range);
        }
        if let Some(range) = self.restrictions.per_unit_weight {
            builder = builder.per_package_weight_limit(range);
        }
        if let Some(dims) = self.restrictions.max_dimensions {
            builder = builder.max_dimensions(dims);
        }
        builder.build()
    }
}

/// Read boundary for dynamically configured provider records.
///
/// Failures degrade at the registry: the last known snapshot is kept
/// when a refresh fails.
#[async_trait]
pub trait ProviderConfigStore: Send + Sync + fmt::Debug {
    /// Loads the current set of dynamic provider records.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the store cannot be
    /// reached, or [`StoreError::Malformed`] for unreadable records.
    async fn load_provider_records(&self) -> StoreResult<Vec<DynamicProviderRecord>>;
}

/// In-memory implementation of [`ProviderConfigStore`].
///
/// Suitable for tests and demos; carries a failure toggle so refresh
/// fallback behavior can be exercised deterministically.
#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    records: RwLock<Vec<DynamicProviderRecord>>,
    fail_next: RwLock<bool>,
}

impl InMemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with records.
    #[must_use]
    pub fn with_records(records: Vec<DynamicProviderRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            fail_next: RwLock::new(false),
        }
    }

    /// Replaces the stored records.
    pub fn set_records(&self, records: Vec<DynamicProviderRecord>) {
        *self.records.write() = records;
    }

    /// Makes subsequent loads fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        *self.fail_next.write() = failing;
    }
}

#[async_trait]
impl ProviderConfigStore for InMemoryConfigStore {
    async fn load_provider_records(&self) -> StoreResult<Vec<DynamicProviderRecord>> {
        if *self.fail_next.read() {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(self.records.read().clone())
    }
}
