//! Pure aggregation of delivery outcomes.

use faro_core::{BroadcastSummary, DeliveryOutcome, DeliveryStatus};

/// Fold per-subscriber outcomes into a [`BroadcastSummary`].
///
/// `attempted` is the outcome count (the engine produces exactly one outcome
/// per listed subscriber). `removed` counts outcomes whose registry delete
/// actually succeeded — an endpoint whose pruning failed stays in the store
/// and is not counted, so a later broadcast can retry it.
pub fn summarize(outcomes: &[DeliveryOutcome]) -> BroadcastSummary {
    BroadcastSummary {
        attempted: outcomes.len(),
        sent: outcomes
            .iter()
            .filter(|o| o.status == DeliveryStatus::Sent)
            .count(),
        removed: outcomes.iter().filter(|o| o.removed).count(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
