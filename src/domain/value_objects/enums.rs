//! # Domain Enums
//!
//! Classification enums shared across the engine: shipment classes,
//! service levels, transport modes, and provider origin tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a shipment for eligibility purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentClass {
    /// Small-package parcel shipping.
    Parcel,
    /// Palletized or heavy freight.
    Freight,
}

impl fmt::Display for ShipmentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parcel => write!(f, "parcel"),
            Self::Freight => write!(f, "freight"),
        }
    }
}

/// Requested service level for a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    /// Standard transit.
    #[default]
    Standard,
    /// Expedited transit.
    Expedited,
    /// Guaranteed delivery date.
    Guaranteed,
    /// Slowest, cheapest option.
    Economy,
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Expedited => write!(f, "expedited"),
            Self::Guaranteed => write!(f, "guaranteed"),
            Self::Economy => write!(f, "economy"),
        }
    }
}

/// Transport mode of a quoted service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Ground parcel.
    #[default]
    Ground,
    /// Air freight or parcel.
    Air,
    /// Less-than-truckload freight.
    Ltl,
    /// Ocean freight.
    Ocean,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ground => write!(f, "ground"),
            Self::Air => write!(f, "air"),
            Self::Ltl => write!(f, "ltl"),
            Self::Ocean => write!(f, "ocean"),
        }
    }
}

/// Where a provider descriptor came from.
///
/// Both origins are projected into the same [`crate::domain::provider::ProviderDescriptor`]
/// shape; downstream logic never branches on this tag, it exists for
/// diagnostics and registry merge semantics (dynamic supersedes static).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOrigin {
    /// Compiled into the static provider list.
    Static,
    /// Projected from the backing configuration store.
    Dynamic,
}

impl fmt::Display for ProviderOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}
