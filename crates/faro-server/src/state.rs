//! Shared application state handed to every route handler.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use faro_push::{BroadcastEngine, WebPushTransport};
use faro_store::SubscriptionStore;

/// Everything the HTTP layer needs: the registry for subscribe/unsubscribe,
/// the engine for broadcasts, and the public key browsers ask for.
pub struct AppState {
    /// The durable subscription registry.
    pub registry: Arc<SubscriptionStore>,
    /// Fan-out engine over the registry and the Web Push transport.
    pub engine: BroadcastEngine<SubscriptionStore, WebPushTransport>,
    /// VAPID public key served as the browser `applicationServerKey`.
    pub vapid_public_key: String,
    /// Prometheus exposition handle for `/metrics`.
    pub metrics: PrometheusHandle,
}

/// Convenience alias used by the router and handlers.
pub type SharedState = Arc<AppState>;
