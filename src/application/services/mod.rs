//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! This module provides application-level services including:
//! - [`RateShopEngine`]: The rate shopping facade
//! - [`FetchOrchestrator`]: Concurrent provider fan-out under a deadline
//! - [`RateNormalizer`]: Raw-rate translation with provenance stamping
//! - [`aggregate`]: Result merging and price ranking

pub mod aggregation;
pub mod engine;
pub mod normalizer;
pub mod orchestrator;

pub use aggregation::{AggregateResult, FetchSummary, ProviderTiming, aggregate};
pub use engine::{RateShopEngine, RateShopEngineBuilder};
pub use normalizer::RateNormalizer;
pub use orchestrator::{
    DEADLINE_BUFFER_MS, FetchOptions, FetchOrchestrator, ProgressCallback, ProgressEvent,
    ProviderFetchResult,
};
