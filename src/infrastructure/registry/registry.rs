//! # Provider Registry
//!
//! Merges the statically compiled provider list with the dynamic
//! snapshot from the backing configuration store.
//!
//! The dynamic snapshot is cached per registry instance and refreshed
//! only when its age exceeds the TTL. A failed refresh keeps the
//! previous snapshot (with a warning) so a transient outage never
//! empties the registry.

use crate::domain::provider::ProviderDescriptor;
use crate::infrastructure::registry::store::ProviderConfigStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Default snapshot TTL.
pub const DEFAULT_REGISTRY_TTL: Duration = Duration::from_secs(30);

/// Cached dynamic snapshot with its refresh timestamp.
///
/// Owned by the registry instance and injected nowhere else; there is
/// no process-wide cache state.
#[derive(Debug, Default)]
struct SnapshotCache {
    snapshot: Vec<ProviderDescriptor>,
    refreshed_at: Option<Instant>,
}

/// Registry merging static and dynamically configured providers.
#[derive(Debug)]
pub struct ProviderRegistry {
    statics: Vec<ProviderDescriptor>,
    store: Arc<dyn ProviderConfigStore>,
    ttl: Duration,
    cache: Mutex<SnapshotCache>,
}

impl ProviderRegistry {
    /// Creates a registry with the default TTL.
    #[must_use]
    pub fn new(statics: Vec<ProviderDescriptor>, store: Arc<dyn ProviderConfigStore>) -> Self {
        Self::with_ttl(statics, store, DEFAULT_REGISTRY_TTL)
    }

    /// Creates a registry with a custom snapshot TTL.
    #[must_use]
    pub fn with_ttl(
        statics: Vec<ProviderDescriptor>,
        store: Arc<dyn ProviderConfigStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            statics,
            store,
            ttl,
            cache: Mutex::new(SnapshotCache::default()),
        }
    }

    /// Returns the configured TTL.
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the merged provider set, ordered by priority then key.
    ///
    /// Dynamic descriptors supersede static ones with the same key.
    pub async fn providers(&self) -> Vec<ProviderDescriptor> {
        let dynamic = self.dynamic_snapshot().await;

        let mut merged: HashMap<_, ProviderDescriptor> = self
            .statics
            .iter()
            .map(|p| (p.key().clone(), p.clone()))
            .collect();
        for provider in dynamic {
            merged.insert(provider.key().clone(), provider);
        }

        let mut providers: Vec<ProviderDescriptor> = merged.into_values().collect();
        providers.sort_by(|a, b| {
            a.priority()
                .cmp(&b.priority())
                .then_with(|| a.key().cmp(b.key()))
        });
        providers
    }

    /// Returns the dynamic snapshot, refreshing it when stale.
    async fn dynamic_snapshot(&self) -> Vec<ProviderDescriptor> {
        let needs_refresh = {
            let cache = self.cache.lock();
            match cache.refreshed_at {
                Some(at) => at.elapsed() > self.ttl,
                None => true,
            }
        };

        if !needs_refresh {
            return self.cache.lock().snapshot.clone();
        }

        match self.store.load_provider_records().await {
            Ok(records) => {
                let snapshot: Vec<ProviderDescriptor> =
                    records.iter().map(|r| r.project()).collect();
                debug!(count = snapshot.len(), "refreshed dynamic provider snapshot");
                let mut cache = self.cache.lock();
                cache.snapshot = snapshot.clone();
                cache.refreshed_at = Some(Instant::now());
                snapshot
            }
            Err(e) => {
                // A transient store failure must not empty the registry.
                let cache = self.cache.lock();
                warn!(
                    error = %e,
                    retained = cache.snapshot.len(),
                    "provider snapshot refresh failed, retaining previous snapshot"
                );
                cache.snapshot.clone()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ProviderOrigin, ShipmentClass};
    use crate::infrastructure::registry::store::{
        DynamicProviderRecord, InMemoryConfigStore, RestrictionRow,
    };

    fn static_provider(key: &str, priority: u32) -> ProviderDescriptor {
        ProviderDescriptor::builder(key, key)
            .supports_class(ShipmentClass::Parcel)
            .priority(priority)
            .build()
    }

    fn dynamic_record(key: &str, priority: u32) -> DynamicProviderRecord {
        DynamicProviderRecord {
            key: key.to_string(),
            display_name: key.to_string(),
            system: "dyn".to_string(),
            classes: vec![ShipmentClass::Freight],
            domestic: true,
            international: true,
            routing: Vec::new(),
            restrictions: RestrictionRow::default(),
            timeout_ms: 8000,
            priority,
        }
    }

    #[tokio::test]
    async fn merges_static_and_dynamic() {
        let store = Arc::new(InMemoryConfigStore::with_records(vec![dynamic_record(
            "dyn", 20,
        )]));
        let registry = ProviderRegistry::new(vec![static_provider("stat", 10)], store);

        let providers = registry.providers().await;
        assert_eq!(providers.len(), 2);
        let keys: Vec<&str> = providers.iter().map(|p| p.key().as_str()).collect();
        assert_eq!(keys, vec!["stat", "dyn"]);
    }

    #[tokio::test]
    async fn dynamic_supersedes_static_on_key_collision() {
        let store = Arc::new(InMemoryConfigStore::with_records(vec![dynamic_record(
            "shared", 10,
        )]));
        let registry = ProviderRegistry::new(vec![static_provider("shared", 10)], store);

        let providers = registry.providers().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(
            providers.first().unwrap().origin(),
            ProviderOrigin::Dynamic
        );
        assert_eq!(providers.first().unwrap().timeout_ms(), 8000);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_cached_within_ttl() {
        let store = Arc::new(InMemoryConfigStore::with_records(vec![dynamic_record(
            "dyn", 10,
        )]));
        let registry =
            ProviderRegistry::with_ttl(Vec::new(), store.clone(), Duration::from_secs(30));

        assert_eq!(registry.providers().await.len(), 1);

        // A store change within the TTL is not picked up.
        store.set_records(vec![dynamic_record("dyn", 10), dynamic_record("new", 20)]);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(registry.providers().await.len(), 1);

        // Past the TTL the refresh lands.
        tokio::time::advance(Duration::from_secs(25)).await;
        assert_eq!(registry.providers().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refresh_failure_retains_previous_snapshot() {
        let store = Arc::new(InMemoryConfigStore::with_records(vec![dynamic_record(
            "dyn", 10,
        )]));
        let registry =
            ProviderRegistry::with_ttl(Vec::new(), store.clone(), Duration::from_secs(30));

        assert_eq!(registry.providers().await.len(), 1);

        store.set_failing(true);
        tokio::time::advance(Duration::from_secs(60)).await;

        // Refresh fails, previous snapshot serves.
        let providers = registry.providers().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers.first().unwrap().key().as_str(), "dyn");
    }

    #[tokio::test]
    async fn store_failure_with_no_snapshot_yields_statics_only() {
        let store = Arc::new(InMemoryConfigStore::new());
        store.set_failing(true);
        let registry = ProviderRegistry::new(vec![static_provider("stat", 10)], store);

        let providers = registry.providers().await;
        assert_eq!(providers.len(), 1);
        assert_eq!(providers.first().unwrap().key().as_str(), "stat");
    }
}
