//! # Domain Layer
//!
//! Core business types and rules for rate aggregation: the shipment and
//! provider models, the universal rate schema, and the eligibility
//! rules engine. Everything here is pure; I/O lives in the
//! infrastructure layer.

pub mod eligibility;
pub mod provider;
pub mod rate;
pub mod shipment;
pub mod value_objects;
