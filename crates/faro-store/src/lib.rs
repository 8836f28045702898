//! # faro-store
//!
//! Subscription registry implementations for the faro push service.
//!
//! - [`SubscriptionStore`] — the durable registry: `SQLite` behind an `r2d2`
//!   connection pool, versioned migrations, writes serialized by an
//!   in-process lock. No in-memory caching: every call reflects the latest
//!   committed state.
//! - [`MemoryRegistry`] — a `HashMap`-backed sibling with identical
//!   semantics, for tests and ephemeral deployments.
//!
//! Both implement [`faro_core::SubscriptionRegistry`].

#![deny(unsafe_code)]

pub mod errors;
pub mod memory;
pub mod sqlite;
pub mod store;

pub use errors::{Result, StoreError};
pub use memory::MemoryRegistry;
pub use sqlite::connection::{ConnectionConfig, ConnectionPool, PooledConnection};
pub use store::SubscriptionStore;
