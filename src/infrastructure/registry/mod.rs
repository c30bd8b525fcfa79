//! # Provider Registry
//!
//! Static + dynamic provider merge with a TTL-cached snapshot of the
//! backing configuration store.

pub mod registry;
pub mod store;

pub use registry::{DEFAULT_REGISTRY_TTL, ProviderRegistry};
pub use store::{
    DynamicProviderRecord, InMemoryConfigStore, ProviderConfigStore, RestrictionRow, RoutingRow,
    StoreError, StoreResult,
};
