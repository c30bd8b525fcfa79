//! # Infrastructure Layer
//!
//! Adapters and I/O boundaries: provider integrations and the provider
//! configuration registry.

pub mod providers;
pub mod registry;
