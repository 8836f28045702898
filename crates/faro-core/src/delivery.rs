//! Per-subscriber delivery outcomes and the broadcast summary.

use serde::{Deserialize, Serialize};

/// Terminal classification of one delivery attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// The push service accepted the message.
    Sent,
    /// The attempt failed (transient or permanent).
    Failed,
}

/// Outcome of one delivery attempt to one subscriber.
///
/// Ephemeral — produced by the engine during a broadcast, consumed by the
/// aggregator, never persisted. `remove` records the engine's classification
/// (endpoint permanently gone); `removed` records whether the registry
/// delete actually succeeded. The two differ when pruning fails, in which
/// case the endpoint stays in the store for a future broadcast to retry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryOutcome {
    /// Endpoint the attempt targeted.
    pub endpoint: String,
    /// Terminal status of the attempt.
    pub status: DeliveryStatus,
    /// Endpoint was classified permanently invalid and should be pruned.
    pub remove: bool,
    /// Pruning was attempted and the registry confirmed the delete.
    pub removed: bool,
}

impl DeliveryOutcome {
    /// Outcome for an accepted delivery.
    pub fn sent(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: DeliveryStatus::Sent,
            remove: false,
            removed: false,
        }
    }

    /// Outcome for a failed delivery; `remove` marks permanent invalidity.
    pub fn failed(endpoint: impl Into<String>, remove: bool) -> Self {
        Self {
            endpoint: endpoint.into(),
            status: DeliveryStatus::Failed,
            remove,
            removed: false,
        }
    }
}

/// Caller-facing result of one broadcast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastSummary {
    /// Subscribers in the snapshot when the broadcast started.
    pub attempted: usize,
    /// Deliveries the push service accepted.
    pub sent: usize,
    /// Dead endpoints actually deleted from the registry.
    pub removed: usize,
}
