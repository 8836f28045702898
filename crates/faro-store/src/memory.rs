//! In-memory subscription registry.
//!
//! Same contract as the `SQLite` store, held in a `HashMap` keyed by
//! endpoint. Used by engine tests and by deployments that accept losing
//! subscriptions on restart.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use faro_core::{BroadcastFilter, RegistryError, Subscription, SubscriptionRegistry};

/// `HashMap`-backed [`SubscriptionRegistry`].
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    subscriptions: RwLock<HashMap<String, Subscription>>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored subscriptions.
    pub fn len(&self) -> usize {
        self.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Subscription>>, RegistryError> {
        self.subscriptions
            .read()
            .map_err(|_| RegistryError::unavailable("registry lock poisoned"))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Subscription>>, RegistryError>
    {
        self.subscriptions
            .write()
            .map_err(|_| RegistryError::unavailable("registry lock poisoned"))
    }
}

#[async_trait]
impl SubscriptionRegistry for MemoryRegistry {
    async fn upsert(&self, sub: &Subscription) -> Result<(), RegistryError> {
        sub.validate()?;
        let _ = self.write()?.insert(sub.endpoint.clone(), sub.clone());
        Ok(())
    }

    async fn remove(&self, endpoint: &str) -> Result<bool, RegistryError> {
        Ok(self.write()?.remove(endpoint).is_some())
    }

    async fn list(&self, filter: &BroadcastFilter) -> Result<Vec<Subscription>, RegistryError> {
        let mut subs: Vec<Subscription> = self
            .read()?
            .values()
            .filter(|sub| filter.matches(sub))
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));
        Ok(subs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
