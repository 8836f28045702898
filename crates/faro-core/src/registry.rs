//! The subscription registry trait.

use async_trait::async_trait;

use crate::errors::RegistryError;
use crate::subscription::{BroadcastFilter, Subscription};

/// Durable set of active push subscriptions.
///
/// Implementations own the persistence; the broadcast engine only sees this
/// trait. Contract:
///
/// - `upsert` validates at the boundary and resolves endpoint conflicts to
///   an update — a second upsert with the same endpoint overwrites key
///   material and owner tag, never creates a duplicate.
/// - `remove` is idempotent: removing an endpoint that is not present
///   returns `Ok(false)`, not an error.
/// - `list` returns the current committed snapshot in a stable order
///   (by endpoint). A `list` sequenced after an `upsert` in the same
///   process observes it.
#[async_trait]
pub trait SubscriptionRegistry: Send + Sync {
    /// Insert or update a subscription keyed by its endpoint.
    async fn upsert(&self, sub: &Subscription) -> Result<(), RegistryError>;

    /// Delete a subscription by endpoint. Returns whether a row existed.
    async fn remove(&self, endpoint: &str) -> Result<bool, RegistryError>;

    /// Snapshot the subscriptions matching `filter`, ordered by endpoint.
    async fn list(&self, filter: &BroadcastFilter) -> Result<Vec<Subscription>, RegistryError>;
}
