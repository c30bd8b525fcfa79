//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`RateId`], [`RequestId`]: UUID-based identifiers
//! - [`ProviderKey`]: string-based provider identity
//!
//! ## Numeric Types
//!
//! - [`Money`] / [`Currency`]: non-negative decimal amounts
//! - [`Weight`], [`WeightRange`], [`Dimensions`]: physical measures
//!
//! ## Geography
//!
//! - [`CountryCode`]: alias-normalized two-letter codes
//! - [`Address`], [`RouteType`]: shipment endpoints and route classification
//!
//! ## Domain Enums
//!
//! - [`ShipmentClass`], [`ServiceLevel`], [`TransportMode`], [`ProviderOrigin`]

pub mod enums;
pub mod geo;
pub mod ids;
pub mod measures;
pub mod money;

pub use enums::{ProviderOrigin, ServiceLevel, ShipmentClass, TransportMode};
pub use geo::{Address, CountryCode, RouteType};
pub use ids::{ProviderKey, RateId, RequestId};
pub use measures::{Dimensions, MeasureError, Weight, WeightRange};
pub use money::{Currency, Money, MoneyError};
