//! Settings error types.

use thiserror::Error;

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file exists but could not be read.
    #[error("failed to read settings file {path}: {reason}")]
    Read {
        /// File path.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },

    /// Settings file contains invalid JSON or wrong types.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment override carries an unparseable value.
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv {
        /// Environment variable name.
        var: String,
        /// What made the value invalid.
        reason: String,
    },
}

/// Convenience type alias for settings results.
pub type Result<T> = std::result::Result<T, SettingsError>;
