//! Broadcast fan-out engine.
//!
//! One broadcast: snapshot the subscriber set, dispatch one delivery per
//! subscriber with a cap on in-flight transport calls, classify every
//! outcome, prune endpoints the push service reported permanently gone,
//! and fold the outcomes into a summary.
//!
//! Deliveries are independent — one subscriber's failure never blocks or
//! fails another's attempt, and the call returns only after every delivery
//! and removal has settled. Cancellation is cooperative: dropping the
//! returned future abandons outstanding work at its next await point and
//! produces no summary; individual removals are atomic, so the store stays
//! consistent.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use metrics::counter;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use faro_core::text::compact_endpoint;
use faro_core::{
    BroadcastFilter, BroadcastSummary, DeliveryOutcome, NotificationPayload, RegistryError,
    Subscription, SubscriptionRegistry,
};

use crate::summary::summarize;
use crate::transport::{PushOutcome, PushTransport};

/// Default cap on simultaneous transport calls per broadcast.
const DEFAULT_MAX_IN_FLIGHT: usize = 32;

/// Fan-out engine over a registry and a delivery transport.
pub struct BroadcastEngine<R, T> {
    registry: Arc<R>,
    transport: Arc<T>,
    max_in_flight: usize,
}

impl<R, T> BroadcastEngine<R, T>
where
    R: SubscriptionRegistry,
    T: PushTransport,
{
    /// Create an engine with the default in-flight cap.
    pub fn new(registry: Arc<R>, transport: Arc<T>) -> Self {
        Self {
            registry,
            transport,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Override the cap on simultaneous deliveries (clamped to at least 1).
    pub fn with_max_in_flight(mut self, cap: usize) -> Self {
        self.max_in_flight = cap.max(1);
        self
    }

    /// Broadcast `payload` to every subscriber matching `filter`.
    ///
    /// Fails only when the initial subscriber listing fails; every later
    /// problem (delivery failure, removal failure) is recorded in the
    /// summary or the log, never escalated.
    pub async fn broadcast(
        &self,
        payload: &NotificationPayload,
        filter: &BroadcastFilter,
    ) -> Result<BroadcastSummary, RegistryError> {
        let broadcast_id = format!("bc_{}", Uuid::now_v7());
        let span = info_span!("broadcast", id = %broadcast_id, owner_tag = ?filter.owner_tag);
        self.run(payload, filter).instrument(span).await
    }

    async fn run(
        &self,
        payload: &NotificationPayload,
        filter: &BroadcastFilter,
    ) -> Result<BroadcastSummary, RegistryError> {
        let subscribers = self.registry.list(filter).await?;
        if subscribers.is_empty() {
            info!("no matching subscribers, nothing to send");
            return Ok(BroadcastSummary::default());
        }

        counter!("push_broadcasts_total").increment(1);
        let attempted = subscribers.len();
        info!(attempted, "dispatching broadcast");

        // Serialize once; every subscriber gets the same bytes.
        let body = payload.to_wire_json().to_string().into_bytes();

        let mut outcomes: Vec<DeliveryOutcome> = stream::iter(subscribers)
            .map(|sub| self.attempt(sub, &body))
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await;

        self.prune(&mut outcomes).await;

        let summary = summarize(&outcomes);
        info!(
            attempted = summary.attempted,
            sent = summary.sent,
            removed = summary.removed,
            "broadcast complete"
        );
        Ok(summary)
    }

    /// One delivery attempt, classified. Never fails.
    async fn attempt(&self, sub: Subscription, body: &[u8]) -> DeliveryOutcome {
        match self.transport.deliver(&sub, body).await {
            PushOutcome::Accepted => {
                counter!("push_deliveries_sent_total").increment(1);
                DeliveryOutcome::sent(sub.endpoint)
            }
            PushOutcome::Gone => {
                counter!("push_deliveries_failed_total").increment(1);
                warn!(
                    endpoint = %compact_endpoint(&sub.endpoint),
                    "endpoint permanently gone, will prune"
                );
                DeliveryOutcome::failed(sub.endpoint, true)
            }
            PushOutcome::Failed { reason } => {
                counter!("push_deliveries_failed_total").increment(1);
                warn!(
                    endpoint = %compact_endpoint(&sub.endpoint),
                    reason,
                    "delivery failed, subscription kept"
                );
                DeliveryOutcome::failed(sub.endpoint, false)
            }
        }
    }

    /// Remove every endpoint classified permanently gone. A removal failure
    /// is logged and leaves `removed` unset; the endpoint stays in the store
    /// for a future broadcast to observe again.
    async fn prune(&self, outcomes: &mut [DeliveryOutcome]) {
        for outcome in outcomes.iter_mut().filter(|o| o.remove) {
            match self.registry.remove(&outcome.endpoint).await {
                Ok(_) => {
                    counter!("push_endpoints_pruned_total").increment(1);
                    info!(
                        endpoint = %compact_endpoint(&outcome.endpoint),
                        "pruned dead subscription"
                    );
                    outcome.removed = true;
                }
                Err(e) => {
                    warn!(
                        endpoint = %compact_endpoint(&outcome.endpoint),
                        error = %e,
                        "failed to prune dead subscription, keeping it for a later sweep"
                    );
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
