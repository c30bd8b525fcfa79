//! # Physical Measures
//!
//! Weight and dimension value objects used by eligibility rules.
//!
//! Weights are expressed in pounds and dimensions in inches, matching the
//! units the provider capability tables are configured in. Both reject
//! non-positive values at construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for measure construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// Value was zero or negative.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// The offending field name.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// Range bounds were inverted.
    #[error("invalid weight range: min {min} exceeds max {max}")]
    InvertedRange {
        /// Lower bound.
        min: Decimal,
        /// Upper bound.
        max: Decimal,
    },
}

/// A positive weight in pounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(Decimal);

impl Weight {
    /// Creates a new weight.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::NonPositive`] if `pounds` is zero or negative.
    pub fn new(pounds: Decimal) -> Result<Self, MeasureError> {
        if pounds <= Decimal::ZERO {
            return Err(MeasureError::NonPositive {
                field: "weight",
                value: pounds,
            });
        }
        Ok(Self(pounds))
    }

    /// Creates a weight from an integer number of pounds.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::NonPositive`] if `pounds` is zero or negative.
    pub fn from_lbs(pounds: i64) -> Result<Self, MeasureError> {
        Self::new(Decimal::from(pounds))
    }

    /// Returns the weight in pounds.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Multiplies the weight by a package quantity.
    #[must_use]
    pub fn scaled(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}lb", self.0)
    }
}

/// An inclusive weight range used by provider capability tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRange {
    min: Decimal,
    max: Decimal,
}

impl WeightRange {
    /// Creates a new inclusive weight range.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvertedRange`] if `min` exceeds `max`.
    pub fn new(min: Decimal, max: Decimal) -> Result<Self, MeasureError> {
        if min > max {
            return Err(MeasureError::InvertedRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Creates a range from integer pound bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::InvertedRange`] if `min` exceeds `max`.
    pub fn from_lbs(min: i64, max: i64) -> Result<Self, MeasureError> {
        Self::new(Decimal::from(min), Decimal::from(max))
    }

    /// Returns the lower bound in pounds.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Decimal {
        self.min
    }

    /// Returns the upper bound in pounds.
    #[inline]
    #[must_use]
    pub fn max(&self) -> Decimal {
        self.max
    }

    /// Returns true if the given weight falls within the range (inclusive).
    #[must_use]
    pub fn contains(&self, pounds: Decimal) -> bool {
        pounds >= self.min && pounds <= self.max
    }
}

impl fmt::Display for WeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}lb, {}lb]", self.min, self.max)
    }
}

/// Package dimensions in inches (length, width, height).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    length: Decimal,
    width: Decimal,
    height: Decimal,
}

impl Dimensions {
    /// Creates new dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::NonPositive`] if any side is zero or negative.
    pub fn new(length: Decimal, width: Decimal, height: Decimal) -> Result<Self, MeasureError> {
        for (field, value) in [("length", length), ("width", width), ("height", height)] {
            if value <= Decimal::ZERO {
                return Err(MeasureError::NonPositive { field, value });
            }
        }
        Ok(Self {
            length,
            width,
            height,
        })
    }

    /// Creates dimensions from integer inch sides.
    ///
    /// # Errors
    ///
    /// Returns [`MeasureError::NonPositive`] if any side is zero or negative.
    pub fn from_inches(length: i64, width: i64, height: i64) -> Result<Self, MeasureError> {
        Self::new(
            Decimal::from(length),
            Decimal::from(width),
            Decimal::from(height),
        )
    }

    /// Returns the length in inches.
    #[inline]
    #[must_use]
    pub fn length(&self) -> Decimal {
        self.length
    }

    /// Returns the width in inches.
    #[inline]
    #[must_use]
    pub fn width(&self) -> Decimal {
        self.width
    }

    /// Returns the height in inches.
    #[inline]
    #[must_use]
    pub fn height(&self) -> Decimal {
        self.height
    }

    /// Returns true if every side fits within the given maximums.
    ///
    /// Sides are compared in declared order; the engine does not attempt
    /// rotation when checking fit.
    #[must_use]
    pub fn fits_within(&self, max: &Dimensions) -> bool {
        self.length <= max.length && self.width <= max.width && self.height <= max.height
    }

    /// Computes the cubic (dimensional) weight for the given divisor.
    ///
    /// Cubic weight is `length * width * height / divisor`, the standard
    /// volumetric pricing formula. Returns `None` when the divisor is not
    /// positive or the volume overflows.
    #[must_use]
    pub fn cubic_weight(&self, divisor: Decimal) -> Option<Decimal> {
        if divisor <= Decimal::ZERO {
            return None;
        }
        self.length
            .checked_mul(self.width)?
            .checked_mul(self.height)?
            .checked_div(divisor)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}in", self.length, self.width, self.height)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn weight_rejects_non_positive() {
        assert!(Weight::from_lbs(0).is_err());
        assert!(Weight::from_lbs(-5).is_err());
        assert!(Weight::from_lbs(1).is_ok());
    }

    #[test]
    fn weight_scaled() {
        let weight = Weight::from_lbs(10).unwrap();
        assert_eq!(weight.scaled(3), Decimal::from(30));
    }

    #[test]
    fn weight_range_contains() {
        let range = WeightRange::from_lbs(100, 500).unwrap();
        assert!(range.contains(Decimal::from(100)));
        assert!(range.contains(Decimal::from(500)));
        assert!(!range.contains(Decimal::from(99)));
        assert!(!range.contains(Decimal::from(501)));
    }

    #[test]
    fn weight_range_rejects_inverted() {
        assert!(matches!(
            WeightRange::from_lbs(10, 5),
            Err(MeasureError::InvertedRange { .. })
        ));
    }

    #[test]
    fn dimensions_rejects_non_positive_side() {
        assert!(Dimensions::from_inches(0, 10, 10).is_err());
        assert!(Dimensions::from_inches(10, -1, 10).is_err());
    }

    #[test]
    fn dimensions_fits_within() {
        let package = Dimensions::from_inches(40, 48, 60).unwrap();
        let max = Dimensions::from_inches(48, 48, 72).unwrap();
        assert!(package.fits_within(&max));
        assert!(!max.fits_within(&package));
    }

    #[test]
    fn cubic_weight() {
        let dims = Dimensions::from_inches(10, 10, 10).unwrap();
        let cubic = dims.cubic_weight(Decimal::from(100)).unwrap();
        assert_eq!(cubic, Decimal::from(10));
    }

    #[test]
    fn cubic_weight_invalid_divisor() {
        let dims = Dimensions::from_inches(10, 10, 10).unwrap();
        assert!(dims.cubic_weight(Decimal::ZERO).is_none());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Weight::from_lbs(25).unwrap().to_string(), "25lb");
        assert_eq!(
            Dimensions::from_inches(1, 2, 3).unwrap().to_string(),
            "1x2x3in"
        );
        assert_eq!(
            WeightRange::from_lbs(1, 2).unwrap().to_string(),
            "[1lb, 2lb]"
        );
    }
}
