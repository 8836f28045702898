//! `SQLite` persistence layer: pool, migrations, repository.

pub mod connection;
pub mod migrations;
pub mod repository;

pub use connection::{ConnectionConfig, ConnectionPool, PooledConnection};
pub use migrations::run_migrations;
pub use repository::{SubscriptionRepo, SubscriptionRow};
