//! # Eligibility Rules Engine
//!
//! Decides which providers may be asked to quote a shipment.
//!
//! Rules are evaluated per provider in a fixed order, short-circuiting
//! on the first failure: shipment class, geography, weight bounds,
//! dimension bounds. Evaluation is a pure function over the shipment
//! and the provider descriptor; verdicts are computed fresh per request
//! and never cached.

use crate::domain::provider::ProviderDescriptor;
use crate::domain::shipment::Shipment;
use crate::domain::value_objects::{ProviderKey, RouteType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Rule categories, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    /// Shipment class must be among the provider's supported classes.
    ClassSupport,
    /// Route-type flags and routing rules must admit the lane.
    GeoSupport,
    /// Total and per-package weight must fall within declared bounds.
    WeightBounds,
    /// Every package must fit within declared maximum dimensions.
    DimensionBounds,
}

impl RuleName {
    /// All rules in evaluation order.
    pub const ALL: [RuleName; 4] = [
        RuleName::ClassSupport,
        RuleName::GeoSupport,
        RuleName::WeightBounds,
        RuleName::DimensionBounds,
    ];
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassSupport => write!(f, "class_support"),
            Self::GeoSupport => write!(f, "geo_support"),
            Self::WeightBounds => write!(f, "weight_bounds"),
            Self::DimensionBounds => write!(f, "dimension_bounds"),
        }
    }
}

/// Optional dimensional-weight rule.
///
/// When configured, the weight checked against per-package bounds is
/// `max(actual, length*width*height / divisor)`. The commercial intent
/// of the legacy rule is unconfirmed, so it ships disabled and the
/// divisor is caller-supplied rather than hard-coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubicWeightRule {
    /// Volumetric divisor (cubic inches per pound).
    pub divisor: Decimal,
}

/// Tuning for eligibility evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// Optional dimensional-weight override for per-package checks.
    pub cubic_weight: Option<CubicWeightRule>,
}

/// Per-provider eligibility outcome with rule-level diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    /// The evaluated provider.
    pub provider: ProviderKey,
    /// True when every rule passed.
    pub eligible: bool,
    /// Rules that passed, in evaluation order.
    pub passed: Vec<RuleName>,
    /// Rules that failed (at most one, evaluation short-circuits).
    pub failed: Vec<RuleName>,
    /// The provider's priority rank, echoed for ordering.
    pub priority: u32,
}

impl fmt::Display for EligibilityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.eligible {
            write!(f, "{}: eligible", self.provider)
        } else {
            let failed: Vec<String> = self.failed.iter().map(ToString::to_string).collect();
            write!(f, "{}: ineligible ({})", self.provider, failed.join(", "))
        }
    }
}

/// Evaluates one provider against one shipment.
#[must_use]
pub fn evaluate(
    shipment: &Shipment,
    provider: &ProviderDescriptor,
    config: &EligibilityConfig,
) -> EligibilityVerdict {
    let mut passed = Vec::new();
    let mut failed = Vec::new();

    for rule in RuleName::ALL {
        let ok = match rule {
            RuleName::ClassSupport => check_class(shipment, provider),
            RuleName::GeoSupport => check_geo(shipment, provider),
            RuleName::WeightBounds => check_weight(shipment, provider, config),
            RuleName::DimensionBounds => check_dimensions(shipment, provider),
        };
        if ok {
            passed.push(rule);
        } else {
            debug!(provider = %provider.key(), rule = %rule, "eligibility rule failed");
            failed.push(rule);
            break;
        }
    }

    EligibilityVerdict {
        provider: provider.key().clone(),
        eligible: failed.is_empty(),
        passed,
        failed,
        priority: provider.priority(),
    }
}

/// Selects the eligible providers for a shipment, ordered by ascending
/// priority (lower = preferred). The sort is stable, so equal-priority
/// providers keep their registry order.
#[must_use]
pub fn select_eligible(
    shipment: &Shipment,
    providers: &[ProviderDescriptor],
    config: &EligibilityConfig,
) -> Vec<ProviderDescriptor> {
    let mut eligible: Vec<ProviderDescriptor> = providers
        .iter()
        .filter(|p| evaluate(shipment, p, config).eligible)
        .cloned()
        .collect();
    eligible.sort_by_key(ProviderDescriptor::priority);
    eligible
}

/// Evaluates every provider, returning all verdicts for diagnostics.
#[must_use]
pub fn evaluate_all(
    shipment: &Shipment,
    providers: &[ProviderDescriptor],
    config: &EligibilityConfig,
) -> Vec<EligibilityVerdict> {
    providers
        .iter()
        .map(|p| evaluate(shipment, p, config))
        .collect()
}

fn check_class(shipment: &Shipment, provider: &ProviderDescriptor) -> bool {
    provider.supported_classes().contains(&shipment.class())
}

fn check_geo(shipment: &Shipment, provider: &ProviderDescriptor) -> bool {
    // Route-type flags gate first, independent of any routing rules.
    let route_ok = match shipment.route_type() {
        RouteType::Domestic => provider.supports_domestic(),
        RouteType::International => provider.supports_international(),
    };
    if !route_ok {
        return false;
    }

    // An empty rule table means no lane restriction.
    if provider.route_rules().is_empty() {
        return true;
    }
    provider.route_rules().iter().any(|rule| {
        rule.origin.matches(shipment.origin()) && rule.destination.matches(shipment.destination())
    })
}

fn check_weight(
    shipment: &Shipment,
    provider: &ProviderDescriptor,
    config: &EligibilityConfig,
) -> bool {
    if let Some(limit) = provider.weight_limit()
        && !limit.contains(shipment.total_weight())
    {
        return false;
    }

    if let Some(limit) = provider.per_package_weight_limit() {
        for package in shipment.packages() {
            let mut weight = package.weight().get();
            if let Some(rule) = &config.cubic_weight
                && let Some(cubic) = package.dimensions().cubic_weight(rule.divisor)
            {
                weight = weight.max(cubic);
            }
            if !limit.contains(weight) {
                return false;
            }
        }
    }
    true
}

fn check_dimensions(shipment: &Shipment, provider: &ProviderDescriptor) -> bool {
    match provider.max_dimensions() {
        Some(max) => shipment
            .packages()
            .iter()
            .all(|p| p.dimensions().fits_within(max)),
        None => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::provider::{GeoMatch, RouteRule};
    use crate::domain::shipment::Package;
    use crate::domain::value_objects::{
        Address, Dimensions, ShipmentClass, Weight, WeightRange,
    };

    fn freight_shipment(origin: &str, destination: &str, pounds: i64) -> Shipment {
        Shipment::builder(
            Address::new(origin, "ON", "Toronto", "M5V 2T6"),
            Address::new(destination, "BC", "Vancouver", "V6B 1A1"),
            ShipmentClass::Freight,
        )
        .package(Package::new(
            Weight::from_lbs(pounds).unwrap(),
            Dimensions::from_inches(48, 40, 48).unwrap(),
        ))
        .build()
        .unwrap()
    }

    fn freight_provider(key: &str) -> crate::domain::provider::ProviderDescriptorBuilder {
        ProviderDescriptor::builder(key, key).supports_class(ShipmentClass::Freight)
    }

    #[test]
    fn class_mismatch_short_circuits() {
        let shipment = freight_shipment("CA", "CA", 500);
        let provider = ProviderDescriptor::builder("parcels", "Parcels Only")
            .supports_class(ShipmentClass::Parcel)
            .build();

        let verdict = evaluate(&shipment, &provider, &EligibilityConfig::default());
        assert!(!verdict.eligible);
        assert_eq!(verdict.failed, vec![RuleName::ClassSupport]);
        assert!(verdict.passed.is_empty());
    }

    #[test]
    fn domestic_gating_scenario() {
        // A CA -> CA freight lane at 500lb: only the domestic-capable
        // carrier may quote, not the international-only one.
        let shipment = freight_shipment("CA", "CA", 500);

        let international_only = freight_provider("intl")
            .route_support(false, true)
            .build();
        let domestic = freight_provider("dom").route_support(true, true).build();

        let eligible = select_eligible(
            &shipment,
            &[international_only, domestic],
            &EligibilityConfig::default(),
        );

        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible.first().unwrap().key().as_str(), "dom");
    }

    #[test]
    fn alias_country_codes_classify_domestic() {
        let shipment = freight_shipment("CAN", "Canada", 500);
        let domestic_only = freight_provider("dom").route_support(true, false).build();

        let verdict = evaluate(&shipment, &domestic_only, &EligibilityConfig::default());
        assert!(verdict.eligible);
    }

    #[test]
    fn route_rules_restrict_lanes() {
        let shipment = freight_shipment("CA", "US", 500);

        let lane_restricted = freight_provider("lanes")
            .route_rule(RouteRule::new(
                GeoMatch::country("CA"),
                GeoMatch::country("MX"),
            ))
            .build();
        let verdict = evaluate(&shipment, &lane_restricted, &EligibilityConfig::default());
        assert!(!verdict.eligible);
        assert_eq!(verdict.failed, vec![RuleName::GeoSupport]);

        let lane_allowed = freight_provider("lanes")
            .route_rule(RouteRule::new(
                GeoMatch::country("CA"),
                GeoMatch::country("US"),
            ))
            .build();
        assert!(evaluate(&shipment, &lane_allowed, &EligibilityConfig::default()).eligible);
    }

    #[test]
    fn empty_route_rules_auto_pass() {
        let shipment = freight_shipment("CA", "US", 500);
        let unrestricted = freight_provider("open").build();
        assert!(evaluate(&shipment, &unrestricted, &EligibilityConfig::default()).eligible);
    }

    #[test]
    fn total_weight_bounds() {
        let shipment = freight_shipment("CA", "CA", 500);

        let in_range = freight_provider("ok")
            .weight_limit(WeightRange::from_lbs(100, 1000).unwrap())
            .build();
        assert!(evaluate(&shipment, &in_range, &EligibilityConfig::default()).eligible);

        let too_light = freight_provider("heavy")
            .weight_limit(WeightRange::from_lbs(1000, 40000).unwrap())
            .build();
        let verdict = evaluate(&shipment, &too_light, &EligibilityConfig::default());
        assert!(!verdict.eligible);
        assert_eq!(verdict.failed, vec![RuleName::WeightBounds]);
    }

    #[test]
    fn per_package_weight_checked_individually() {
        let shipment = Shipment::builder(
            Address::new("CA", "ON", "Toronto", "M5V"),
            Address::new("CA", "BC", "Vancouver", "V6B"),
            ShipmentClass::Freight,
        )
        .package(Package::new(
            Weight::from_lbs(400).unwrap(),
            Dimensions::from_inches(48, 40, 48).unwrap(),
        ))
        .package(Package::new(
            Weight::from_lbs(3000).unwrap(),
            Dimensions::from_inches(48, 40, 48).unwrap(),
        ))
        .build()
        .unwrap();

        // Total (3400) within bounds, but one pallet exceeds the
        // per-unit ceiling.
        let provider = freight_provider("pallet")
            .weight_limit(WeightRange::from_lbs(1, 40000).unwrap())
            .per_package_weight_limit(WeightRange::from_lbs(1, 2500).unwrap())
            .build();

        let verdict = evaluate(&shipment, &provider, &EligibilityConfig::default());
        assert!(!verdict.eligible);
        assert_eq!(verdict.failed, vec![RuleName::WeightBounds]);
    }

    #[test]
    fn cubic_weight_rule_applies_when_configured() {
        // 60x48x48 = 138240 cubic inches; divisor 100 -> 1382.4lb cubic
        // weight, well over the 100lb actual weight.
        let shipment = Shipment::builder(
            Address::new("CA", "ON", "Toronto", "M5V"),
            Address::new("CA", "BC", "Vancouver", "V6B"),
            ShipmentClass::Freight,
        )
        .package(Package::new(
            Weight::from_lbs(100).unwrap(),
            Dimensions::from_inches(60, 48, 48).unwrap(),
        ))
        .build()
        .unwrap();

        let provider = freight_provider("cubic")
            .per_package_weight_limit(WeightRange::from_lbs(1, 1000).unwrap())
            .build();

        // Disabled by default: actual weight governs.
        assert!(evaluate(&shipment, &provider, &EligibilityConfig::default()).eligible);

        let config = EligibilityConfig {
            cubic_weight: Some(CubicWeightRule {
                divisor: Decimal::from(100),
            }),
        };
        assert!(!evaluate(&shipment, &provider, &config).eligible);
    }

    #[test]
    fn dimension_bounds() {
        let shipment = freight_shipment("CA", "CA", 500);

        let too_small = freight_provider("small")
            .max_dimensions(Dimensions::from_inches(40, 40, 40).unwrap())
            .build();
        let verdict = evaluate(&shipment, &too_small, &EligibilityConfig::default());
        assert!(!verdict.eligible);
        assert_eq!(verdict.failed, vec![RuleName::DimensionBounds]);
        assert_eq!(
            verdict.passed,
            vec![
                RuleName::ClassSupport,
                RuleName::GeoSupport,
                RuleName::WeightBounds
            ]
        );
    }

    #[test]
    fn select_eligible_orders_by_priority() {
        let shipment = freight_shipment("CA", "CA", 500);
        let providers = vec![
            freight_provider("third").priority(30).build(),
            freight_provider("first").priority(10).build(),
            freight_provider("second").priority(20).build(),
        ];

        let eligible = select_eligible(&shipment, &providers, &EligibilityConfig::default());
        let keys: Vec<&str> = eligible.iter().map(|p| p.key().as_str()).collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
    }

    #[test]
    fn removing_qualifying_attribute_removes_provider() {
        let shipment = freight_shipment("CA", "CA", 500);

        let qualified = freight_provider("q").build();
        assert_eq!(
            select_eligible(
                &shipment,
                std::slice::from_ref(&qualified),
                &EligibilityConfig::default()
            )
            .len(),
            1
        );

        // Same provider minus the class support disappears.
        let unqualified = ProviderDescriptor::builder("q", "q").build();
        assert!(
            select_eligible(&shipment, &[unqualified], &EligibilityConfig::default()).is_empty()
        );
    }

    #[test]
    fn verdict_display() {
        let shipment = freight_shipment("CA", "CA", 500);
        let provider = ProviderDescriptor::builder("p", "P")
            .supports_class(ShipmentClass::Parcel)
            .build();
        let verdict = evaluate(&shipment, &provider, &EligibilityConfig::default());
        assert!(verdict.to_string().contains("class_support"));
    }
}
