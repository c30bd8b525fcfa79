//! # Geography
//!
//! Country normalization, addresses, and route classification.
//!
//! Provider configuration arrives with country codes in several alias
//! forms ("CAN", "Canada", "ca"). [`CountryCode`] collapses them to a
//! canonical two-letter code so route classification and geographic rule
//! matching compare like with like.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical ISO-3166 alpha-2 country code.
///
/// Construction normalizes common alias forms; unrecognized two-letter
/// inputs pass through uppercased so less common countries still work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    /// Creates a canonical country code from any supported alias form.
    #[must_use]
    pub fn new(input: impl AsRef<str>) -> Self {
        let upper = input.as_ref().trim().to_uppercase();
        let canonical = match upper.as_str() {
            "US" | "USA" | "UNITED STATES" | "UNITED STATES OF AMERICA" => "US",
            "CA" | "CAN" | "CANADA" => "CA",
            "MX" | "MEX" | "MEXICO" => "MX",
            "GB" | "GBR" | "UK" | "UNITED KINGDOM" | "GREAT BRITAIN" => "GB",
            other => other,
        };
        Self(canonical.to_string())
    }

    /// Returns the canonical code.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CountryCode {
    fn from(input: &str) -> Self {
        Self::new(input)
    }
}

/// Route classification derived from origin and destination countries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    /// Origin and destination share a country.
    Domestic,
    /// Origin and destination countries differ.
    International,
}

impl RouteType {
    /// Classifies a route from canonical country codes.
    #[must_use]
    pub fn classify(origin: &CountryCode, destination: &CountryCode) -> Self {
        if origin == destination {
            Self::Domestic
        } else {
            Self::International
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domestic => write!(f, "domestic"),
            Self::International => write!(f, "international"),
        }
    }
}

/// A shipment endpoint address.
///
/// Only the fields relevant to eligibility and translation are carried;
/// street-level detail stays with the calling application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Country, normalized at construction.
    country: CountryCode,
    /// State or province code.
    region: String,
    /// City name.
    city: String,
    /// Postal or ZIP code.
    postal_code: String,
}

impl Address {
    /// Creates a new address.
    #[must_use]
    pub fn new(
        country: impl AsRef<str>,
        region: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            country: CountryCode::new(country),
            region: region.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Returns the country code.
    #[inline]
    #[must_use]
    pub fn country(&self) -> &CountryCode {
        &self.country
    }

    /// Returns the region code.
    #[inline]
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the city.
    #[inline]
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the postal code.
    #[inline]
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} {} {}",
            self.city, self.region, self.postal_code, self.country
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_alias_normalization() {
        assert_eq!(CountryCode::new("CAN").as_str(), "CA");
        assert_eq!(CountryCode::new("Canada").as_str(), "CA");
        assert_eq!(CountryCode::new("ca").as_str(), "CA");
        assert_eq!(CountryCode::new("USA").as_str(), "US");
        assert_eq!(CountryCode::new("United States").as_str(), "US");
        assert_eq!(CountryCode::new("UK").as_str(), "GB");
        assert_eq!(CountryCode::new("MEX").as_str(), "MX");
    }

    #[test]
    fn country_passthrough_uppercased() {
        assert_eq!(CountryCode::new("de").as_str(), "DE");
        assert_eq!(CountryCode::new(" jp ").as_str(), "JP");
    }

    #[test]
    fn route_classification() {
        let ca = CountryCode::new("CA");
        let can = CountryCode::new("CAN");
        let us = CountryCode::new("US");

        assert_eq!(RouteType::classify(&ca, &can), RouteType::Domestic);
        assert_eq!(RouteType::classify(&ca, &us), RouteType::International);
    }

    #[test]
    fn address_normalizes_country() {
        let addr = Address::new("Canada", "ON", "Toronto", "M5V 2T6");
        assert_eq!(addr.country().as_str(), "CA");
        assert_eq!(addr.region(), "ON");
    }

    #[test]
    fn route_type_display() {
        assert_eq!(RouteType::Domestic.to_string(), "domestic");
        assert_eq!(RouteType::International.to_string(), "international");
    }
}
