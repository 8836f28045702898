//! High-level `SubscriptionStore` facade over the `SQLite` layer.
//!
//! Wraps a connection pool and the repository into the
//! [`SubscriptionRegistry`] contract. Writes are serialized by an in-process
//! lock; reads go straight to the pool. The lock is taken and released
//! around a synchronous database call only, never across an await point.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, instrument};

use faro_core::text::compact_endpoint;
use faro_core::{BroadcastFilter, RegistryError, Subscription, SubscriptionRegistry};

use crate::errors::{Result, StoreError};
use crate::sqlite::connection::{self, ConnectionConfig, ConnectionPool, PooledConnection};
use crate::sqlite::migrations::run_migrations;
use crate::sqlite::repository::SubscriptionRepo;

/// Durable subscription registry backed by `SQLite`.
///
/// No in-memory cache is kept: every call reflects the latest committed
/// state, so an upsert is visible to any `list` sequenced after it in the
/// same process.
pub struct SubscriptionStore {
    pool: ConnectionPool,
    write_lock: Mutex<()>,
}

impl SubscriptionStore {
    /// Open (or create) the database at `path` and run pending migrations.
    pub fn open(path: &str, config: &ConnectionConfig) -> Result<Self> {
        let pool = connection::new_file(path, config)?;
        let conn = pool.get()?;
        let _ = run_migrations(&conn)?;
        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }

    /// Open an in-memory database (tests and ephemeral deployments).
    pub fn in_memory() -> Result<Self> {
        let pool = connection::new_in_memory(&ConnectionConfig::default())?;
        let conn = pool.get()?;
        let _ = run_migrations(&conn)?;
        Ok(Self {
            pool,
            write_lock: Mutex::new(()),
        })
    }

    /// Number of stored subscriptions.
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn()?;
        SubscriptionRepo::count(&conn)
    }

    fn conn(&self) -> Result<PooledConnection> {
        Ok(self.pool.get()?)
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Internal("write lock poisoned".into()))
    }

    fn upsert_sync(&self, sub: &Subscription) -> Result<bool> {
        let _guard = self.lock_writes()?;
        let conn = self.conn()?;
        SubscriptionRepo::upsert(&conn, sub)
    }

    fn remove_sync(&self, endpoint: &str) -> Result<bool> {
        let _guard = self.lock_writes()?;
        let conn = self.conn()?;
        SubscriptionRepo::remove(&conn, endpoint)
    }

    fn list_sync(&self, filter: &BroadcastFilter) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;
        let rows = SubscriptionRepo::list(&conn, filter)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl SubscriptionRegistry for SubscriptionStore {
    #[instrument(skip_all, fields(endpoint = %compact_endpoint(&sub.endpoint)))]
    async fn upsert(&self, sub: &Subscription) -> std::result::Result<(), RegistryError> {
        sub.validate()?;
        let created = self.upsert_sync(sub)?;
        debug!(created, "subscription upserted");
        Ok(())
    }

    #[instrument(skip_all, fields(endpoint = %compact_endpoint(endpoint)))]
    async fn remove(&self, endpoint: &str) -> std::result::Result<bool, RegistryError> {
        let deleted = self.remove_sync(endpoint)?;
        debug!(deleted, "subscription removed");
        Ok(deleted)
    }

    async fn list(
        &self,
        filter: &BroadcastFilter,
    ) -> std::result::Result<Vec<Subscription>, RegistryError> {
        Ok(self.list_sync(filter)?)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
