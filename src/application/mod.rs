//! # Application Layer
//!
//! Use-case orchestration over the domain: fetch coordination,
//! normalization, aggregation, and the engine facade.

pub mod error;
pub mod services;

pub use error::{EngineError, EngineResult};
