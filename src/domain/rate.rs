//! # Universal Rate
//!
//! The canonical, provider-agnostic rate representation.
//!
//! Every provider response is normalized into [`UniversalRate`] so
//! ranking and selection never touch provider wire formats. Provenance
//! distinguishes the *source* provider (who was queried) from the
//! *display* carrier (whose service is being resold).

use crate::domain::value_objects::{Currency, Money, ProviderKey, RateId, TransportMode, Weight};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for rate construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Pricing components used more than one currency.
    #[error("pricing breakdown mixes currencies")]
    MixedCurrencies,

    /// Pricing arithmetic overflowed.
    #[error("pricing breakdown overflow")]
    Overflow,
}

/// Identity of the provider a rate came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSource {
    /// Provider key.
    pub key: ProviderKey,
    /// Provider display name.
    pub name: String,
    /// Backend system tag.
    pub system: String,
}

impl RateSource {
    /// Creates a new rate source.
    #[must_use]
    pub fn new(
        key: impl Into<ProviderKey>,
        name: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            system: system.into(),
        }
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key, self.system)
    }
}

/// The quoted service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Human-readable service name.
    pub name: String,
    /// Provider service code, if any.
    pub code: Option<String>,
    /// Transport mode.
    pub mode: TransportMode,
}

impl ServiceDescriptor {
    /// Creates a new service descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, mode: TransportMode) -> Self {
        Self {
            name: name.into(),
            code: None,
            mode,
        }
    }

    /// Sets the provider service code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Pricing breakdown for a rate.
///
/// Invariant: all components and the total are non-negative amounts in
/// a single currency ([`Money`] enforces non-negativity, construction
/// enforces the single currency).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    freight: Money,
    fuel: Money,
    accessorial: Money,
    tax: Money,
    total: Money,
}

impl PriceBreakdown {
    /// Creates a breakdown from components, computing the total.
    ///
    /// # Errors
    ///
    /// Returns [`RateError::MixedCurrencies`] if the components are not
    /// all in the same currency, or [`RateError::Overflow`] on overflow.
    pub fn from_components(
        freight: Money,
        fuel: Money,
        accessorial: Money,
        tax: Money,
    ) -> Result<Self, RateError> {
        let total = freight
            .checked_add(&fuel)
            .and_then(|t| t.checked_add(&accessorial))
            .and_then(|t| t.checked_add(&tax))
            .map_err(|e| match e {
                crate::domain::value_objects::MoneyError::CurrencyMismatch { .. } => {
                    RateError::MixedCurrencies
                }
                _ => RateError::Overflow,
            })?;
        Ok(Self {
            freight,
            fuel,
            accessorial,
            tax,
            total,
        })
    }

    /// Creates a breakdown from a provider-supplied total only.
    #[must_use]
    pub fn from_total(total: Money) -> Self {
        let currency = total.currency();
        Self {
            freight: Money::zero(currency),
            fuel: Money::zero(currency),
            accessorial: Money::zero(currency),
            tax: Money::zero(currency),
            total,
        }
    }

    /// Returns the freight charge.
    #[inline]
    #[must_use]
    pub fn freight(&self) -> &Money {
        &self.freight
    }

    /// Returns the fuel surcharge.
    #[inline]
    #[must_use]
    pub fn fuel(&self) -> &Money {
        &self.fuel
    }

    /// Returns the accessorial charges.
    #[inline]
    #[must_use]
    pub fn accessorial(&self) -> &Money {
        &self.accessorial
    }

    /// Returns the tax amount.
    #[inline]
    #[must_use]
    pub fn tax(&self) -> &Money {
        &self.tax
    }

    /// Returns the total price.
    #[inline]
    #[must_use]
    pub fn total(&self) -> &Money {
        &self.total
    }

    /// Returns the total amount as a decimal (ranking key).
    #[inline]
    #[must_use]
    pub fn total_amount(&self) -> Decimal {
        self.total.amount()
    }

    /// Returns the currency of the breakdown.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.total.currency()
    }
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.total)
    }
}

/// Transit characteristics of a quoted service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transit {
    /// Transit time in business days.
    pub days: Option<u32>,
    /// True when the delivery date is guaranteed.
    pub guaranteed: bool,
    /// Estimated delivery timestamp.
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Service feature flags echoed from the quote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateFeatures {
    /// Liftgate at delivery.
    pub liftgate: bool,
    /// Residential delivery.
    pub residential: bool,
    /// Hazardous materials handling.
    pub hazmat: bool,
    /// Inside delivery.
    pub inside_delivery: bool,
    /// Delivery appointment required.
    pub appointment_required: bool,
}

/// The canonical output unit of the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversalRate {
    /// Engine-assigned rate identifier.
    pub rate_id: RateId,
    /// Provider quote reference, if any.
    pub quote_id: Option<String>,
    /// The provider actually queried. Always populated; the normalizer
    /// overwrites whatever a translator put here.
    pub source: RateSource,
    /// Carrier name shown to the end user (reseller scenarios).
    pub display_carrier: String,
    /// Carrier service name shown to the end user, if different.
    pub display_service: Option<String>,
    /// The quoted service.
    pub service: ServiceDescriptor,
    /// Pricing breakdown.
    pub pricing: PriceBreakdown,
    /// Transit characteristics.
    pub transit: Transit,
    /// Billed weight echo, if reported.
    pub billed_weight: Option<Weight>,
    /// Feature flags.
    pub features: RateFeatures,
    /// Raw provider payload for auditability.
    pub raw: Option<serde_json::Value>,
}

impl UniversalRate {
    /// Creates a rate with the mandatory fields; optional fields default.
    #[must_use]
    pub fn new(source: RateSource, service: ServiceDescriptor, pricing: PriceBreakdown) -> Self {
        let display_carrier = source.name.clone();
        Self {
            rate_id: RateId::new_v4(),
            quote_id: None,
            source,
            display_carrier,
            display_service: None,
            service,
            pricing,
            transit: Transit::default(),
            billed_weight: None,
            features: RateFeatures::default(),
            raw: None,
        }
    }

    /// Sets the provider quote reference.
    #[must_use]
    pub fn with_quote_id(mut self, quote_id: impl Into<String>) -> Self {
        self.quote_id = Some(quote_id.into());
        self
    }

    /// Sets the display carrier (reseller scenarios).
    #[must_use]
    pub fn with_display_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.display_carrier = carrier.into();
        self
    }

    /// Sets the transit characteristics.
    #[must_use]
    pub fn with_transit(mut self, transit: Transit) -> Self {
        self.transit = transit;
        self
    }

    /// Sets the feature flags.
    #[must_use]
    pub fn with_features(mut self, features: RateFeatures) -> Self {
        self.features = features;
        self
    }

    /// Attaches the raw provider payload.
    #[must_use]
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = Some(raw);
        self
    }
}

impl fmt::Display for UniversalRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rate({} {} via {} = {})",
            self.display_carrier, self.service.name, self.source.key, self.pricing
        )
    }
}
