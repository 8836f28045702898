//! Registry error taxonomy.

/// Errors surfaced by [`crate::SubscriptionRegistry`] implementations.
///
/// Per-subscriber delivery failures are not errors — they are
/// [`crate::DeliveryOutcome`] values. This enum only covers the operations
/// that abort: rejecting a malformed subscription at the boundary, and the
/// backing store being unreachable.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Subscription or request failed boundary validation. Never retried.
    #[error("invalid subscription: {reason}")]
    Validation {
        /// What was malformed or missing.
        reason: String,
    },
    /// Backing store could not be reached or the operation failed mid-flight.
    #[error("subscription store unavailable: {reason}")]
    Unavailable {
        /// Underlying failure description.
        reason: String,
    },
}

impl RegistryError {
    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    /// Shorthand for a store-unavailable failure.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
