//! # Provider Descriptor
//!
//! Capability metadata for a rate provider.
//!
//! Static and dynamically configured providers are both projected into
//! [`ProviderDescriptor`]; the eligibility engine and the orchestrator
//! are provider-origin-agnostic.

use crate::domain::value_objects::{
    CountryCode, Dimensions, ProviderKey, ProviderOrigin, ShipmentClass, WeightRange,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default per-provider timeout budget in milliseconds.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5000;

/// Geographic match criterion at country, region, or city granularity.
///
/// Fields narrow the match progressively: a populated `region` or `city`
/// must also match for the rule to apply. Text comparison is
/// case-insensitive; countries are compared canonically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoMatch {
    country: CountryCode,
    region: Option<String>,
    city: Option<String>,
}

impl GeoMatch {
    /// Creates a country-level match.
    #[must_use]
    pub fn country(country: impl AsRef<str>) -> Self {
        Self {
            country: CountryCode::new(country),
            region: None,
            city: None,
        }
    }

    /// Narrows the match to a region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Narrows the match to a city.
    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Returns true if the given address satisfies this criterion.
    #[must_use]
    pub fn matches(&self, address: &crate::domain::value_objects::Address) -> bool {
        if &self.country != address.country() {
            return false;
        }
        if let Some(region) = &self.region
            && !region.eq_ignore_ascii_case(address.region())
        {
            return false;
        }
        if let Some(city) = &self.city
            && !city.eq_ignore_ascii_case(address.city())
        {
            return false;
        }
        true
    }
}

/// An origin→destination routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// Origin criterion.
    pub origin: GeoMatch,
    /// Destination criterion.
    pub destination: GeoMatch,
}

impl RouteRule {
    /// Creates a new routing rule.
    #[must_use]
    pub fn new(origin: GeoMatch, destination: GeoMatch) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

/// Capability metadata and tuning for one rate provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    key: ProviderKey,
    display_name: String,
    system: String,
    supported_classes: Vec<ShipmentClass>,
    supports_domestic: bool,
    supports_international: bool,
    route_rules: Vec<RouteRule>,
    weight_limit: Option<WeightRange>,
    per_package_weight_limit: Option<WeightRange>,
    max_dimensions: Option<Dimensions>,
    timeout_ms: u64,
    priority: u32,
    origin: ProviderOrigin,
}

impl ProviderDescriptor {
    /// Starts building a descriptor.
    #[must_use]
    pub fn builder(
        key: impl Into<ProviderKey>,
        display_name: impl Into<String>,
    ) -> ProviderDescriptorBuilder {
        ProviderDescriptorBuilder {
            key: key.into(),
            display_name: display_name.into(),
            system: String::new(),
            supported_classes: Vec::new(),
            supports_domestic: true,
            supports_international: true,
            route_rules: Vec::new(),
            weight_limit: None,
            per_package_weight_limit: None,
            max_dimensions: None,
            timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            priority: 100,
            origin: ProviderOrigin::Static,
        }
    }

    /// Returns the provider key.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &ProviderKey {
        &self.key
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the backend system tag (surfaced in rate provenance).
    #[inline]
    #[must_use]
    pub fn system(&self) -> &str {
        &self.system
    }

    /// Returns the supported shipment classes.
    #[inline]
    #[must_use]
    pub fn supported_classes(&self) -> &[ShipmentClass] {
        &self.supported_classes
    }

    /// Returns true if the provider quotes domestic routes.
    #[inline]
    #[must_use]
    pub fn supports_domestic(&self) -> bool {
        self.supports_domestic
    }

    /// Returns true if the provider quotes international routes.
    #[inline]
    #[must_use]
    pub fn supports_international(&self) -> bool {
        self.supports_international
    }

    /// Returns the routing rules (empty means no restriction).
    #[inline]
    #[must_use]
    pub fn route_rules(&self) -> &[RouteRule] {
        &self.route_rules
    }

    /// Returns the total-shipment weight limit, if any.
    #[inline]
    #[must_use]
    pub fn weight_limit(&self) -> Option<&WeightRange> {
        self.weight_limit.as_ref()
    }

    /// Returns the per-package weight limit, if any.
    #[inline]
    #[must_use]
    pub fn per_package_weight_limit(&self) -> Option<&WeightRange> {
        self.per_package_weight_limit.as_ref()
    }

    /// Returns the maximum package dimensions, if any.
    #[inline]
    #[must_use]
    pub fn max_dimensions(&self) -> Option<&Dimensions> {
        self.max_dimensions.as_ref()
    }

    /// Returns the timeout budget in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the priority rank (lower = preferred).
    #[inline]
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Returns the configuration origin tag.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> ProviderOrigin {
        self.origin
    }
}

impl fmt::Display for ProviderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Provider({} \"{}\" priority={} timeout={}ms {})",
            self.key, self.display_name, self.priority, self.timeout_ms, self.origin
        )
    }
}

/// Builder for [`ProviderDescriptor`].
#[derive(Debug, Clone)]
pub struct ProviderDescriptorBuilder {
    key: ProviderKey,
    display_name: String,
    system: String,
    supported_classes: Vec<ShipmentClass>,
    supports_domestic: bool,
    supports_international: bool,
    route_rules: Vec<RouteRule>,
    weight_limit: Option<WeightRange>,
    per_package_weight_limit: Option<WeightRange>,
    max_dimensions: Option<Dimensions>,
    timeout_ms: u64,
    priority: u32,
    origin: ProviderOrigin,
}

impl ProviderDescriptorBuilder {
    /// Sets the backend system tag.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = system.into();
        self
    }

    /// Adds a supported shipment class.
    #[must_use]
    pub fn supports_class(mut self, class: ShipmentClass) -> Self {
        self.supported_classes.push(class);
        self
    }

    /// Sets the domestic/international route support flags.
    #[must_use]
    pub fn route_support(mut self, domestic: bool, international: bool) -> Self {
        self.supports_domestic = domestic;
        self.supports_international = international;
        self
    }

    /// Adds a routing rule.
    #[must_use]
    pub fn route_rule(mut self, rule: RouteRule) -> Self {
        self.route_rules.push(rule);
        self
    }

    /// Sets the total-shipment weight limit.
    #[must_use]
    pub fn weight_limit(mut self, range: WeightRange) -> Self {
        self.weight_limit = Some(range);
        self
    }

    /// Sets the per-package weight limit.
    #[must_use]
    pub fn per_package_weight_limit(mut self, range: WeightRange) -> Self {
        self.per_package_weight_limit = Some(range);
        self
    }

    /// Sets the maximum package dimensions.
    #[must_use]
    pub fn max_dimensions(mut self, dims: Dimensions) -> Self {
        self.max_dimensions = Some(dims);
        self
    }

    /// Sets the timeout budget in milliseconds.
    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Sets the priority rank (lower = preferred).
    #[must_use]
    pub fn priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the configuration origin tag.
    #[must_use]
    pub fn origin(mut self, origin: ProviderOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Builds the descriptor.
    #[must_use]
    pub fn build(self) -> ProviderDescriptor {
        ProviderDescriptor {
            key: self.key,
            display_name: self.display_name,
            system: self.system,
            supported_classes: self.supported_classes,
            supports_domestic: self.supports_domestic,
            supports_international: self.supports_international,
            route_rules: self.route_rules,
            weight_limit: self.weight_limit,
            per_package_weight_limit: self.per_package_weight_limit,
            max_dimensions: self.max_dimensions,
            timeout_ms: self.timeout_ms,
            priority: self.priority,
            origin: self.origin,
        }
    }
}
