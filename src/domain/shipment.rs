//! # Shipment Model
//!
//! The normalized shipment description used for eligibility evaluation
//! and provider request translation.
//!
//! A [`Shipment`] is immutable once built; the engine evaluates
//! eligibility and issues provider requests against a single frozen
//! snapshot of the caller's input.

use crate::domain::value_objects::{
    Address, Dimensions, Money, RouteType, ServiceLevel, ShipmentClass, Weight,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for shipment construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShipmentError {
    /// A shipment needs at least one package.
    #[error("shipment requires at least one package")]
    NoPackages,

    /// Package quantity must be positive.
    #[error("package quantity must be positive")]
    ZeroQuantity,
}

/// A single package (or handling unit) within a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    weight: Weight,
    dimensions: Dimensions,
    declared_value: Option<Money>,
    quantity: u32,
}

impl Package {
    /// Creates a new package with quantity 1.
    #[must_use]
    pub fn new(weight: Weight, dimensions: Dimensions) -> Self {
        Self {
            weight,
            dimensions,
            declared_value: None,
            quantity: 1,
        }
    }

    /// Sets the declared value.
    #[must_use]
    pub fn with_declared_value(mut self, value: Money) -> Self {
        self.declared_value = Some(value);
        self
    }

    /// Sets the quantity of identical handling units.
    ///
    /// # Errors
    ///
    /// Returns [`ShipmentError::ZeroQuantity`] if `quantity` is zero.
    pub fn with_quantity(mut self, quantity: u32) -> Result<Self, ShipmentError> {
        if quantity == 0 {
            return Err(ShipmentError::ZeroQuantity);
        }
        self.quantity = quantity;
        Ok(self)
    }

    /// Returns the per-unit weight.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Returns the package dimensions.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Returns the declared value, if any.
    #[inline]
    #[must_use]
    pub fn declared_value(&self) -> Option<&Money> {
        self.declared_value.as_ref()
    }

    /// Returns the quantity of identical units.
    #[inline]
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the total weight of all units in this package line.
    #[must_use]
    pub fn total_weight(&self) -> Decimal {
        self.weight.scaled(self.quantity)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Package({}x {} {})",
            self.quantity, self.weight, self.dimensions
        )
    }
}

/// A normalized shipment, frozen for the lifetime of one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    origin: Address,
    destination: Address,
    packages: Vec<Package>,
    class: ShipmentClass,
    service_level: ServiceLevel,
}

impl Shipment {
    /// Starts building a shipment.
    #[must_use]
    pub fn builder(origin: Address, destination: Address, class: ShipmentClass) -> ShipmentBuilder {
        ShipmentBuilder {
            origin,
            destination,
            packages: Vec::new(),
            class,
            service_level: ServiceLevel::default(),
        }
    }

    /// Returns the origin address.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &Address {
        &self.origin
    }

    /// Returns the destination address.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &Address {
        &self.destination
    }

    /// Returns the packages.
    #[inline]
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Returns the shipment class.
    #[inline]
    #[must_use]
    pub fn class(&self) -> ShipmentClass {
        self.class
    }

    /// Returns the requested service level.
    #[inline]
    #[must_use]
    pub fn service_level(&self) -> ServiceLevel {
        self.service_level
    }

    /// Returns the total shipment weight in pounds (sum over packages).
    #[must_use]
    pub fn total_weight(&self) -> Decimal {
        self.packages.iter().map(Package::total_weight).sum()
    }

    /// Classifies the route as domestic or international.
    #[must_use]
    pub fn route_type(&self) -> RouteType {
        RouteType::classify(self.origin.country(), self.destination.country())
    }
}

impl fmt::Display for Shipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Shipment({} {} -> {}, {} packages, {}lb)",
            self.class,
            self.origin.country(),
            self.destination.country(),
            self.packages.len(),
            self.total_weight()
        )
    }
}

/// Builder for [`Shipment`].
#[derive(Debug, Clone)]
pub struct ShipmentBuilder {
    origin: Address,
    destination: Address,
    packages: Vec<Package>,
    class: ShipmentClass,
    service_level: ServiceLevel,
}

impl ShipmentBuilder {
    /// Adds a package.
    #[must_use]
    pub fn package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    /// Sets the requested service level.
    #[must_use]
    pub fn service_level(mut self, level: ServiceLevel) -> Self {
        self.service_level = level;
        self
    }

    /// Builds the shipment.
    ///
    /// # Errors
    ///
    /// Returns [`ShipmentError::NoPackages`] if no package was added.
    pub fn build(self) -> Result<Shipment, ShipmentError> {
        if self.packages.is_empty() {
            return Err(ShipmentError::NoPackages);
        }
        Ok(Shipment {
            origin: self.origin,
            destination: self.destination,
            packages: self.packages,
            class: self.class,
            service_level: self.service_level,
        })
    }
}
