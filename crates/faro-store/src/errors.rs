//! Error types for the subscription store.

use thiserror::Error;

/// Errors that can occur inside the `SQLite` registry.
///
/// Callers outside this crate see [`faro_core::RegistryError`]; this type
/// exists so repository and migration code can use `?` on the underlying
/// driver errors without losing them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `SQLite` database error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Schema migration failed.
    #[error("migration error: {message}")]
    Migration {
        /// Which migration failed and why.
        message: String,
    },

    /// Internal error (e.g. poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for faro_core::RegistryError {
    fn from(err: StoreError) -> Self {
        faro_core::RegistryError::unavailable(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
