//! HTTP routes: thin glue between the wire and the core operations.
//!
//! The interesting behavior lives in `faro-push` and `faro-store`; handlers
//! here only decode requests, call one core operation, and encode the
//! result.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::info;

use faro_core::{BroadcastFilter, NotificationPayload, Subscription, SubscriptionRegistry};

use crate::error::ApiError;
use crate::state::SharedState;

/// Build the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/push/subscribe", post(subscribe))
        .route("/api/push/unsubscribe", post(unsubscribe))
        .route("/api/push/notify", post(notify))
        .route("/api/push/vapid-public-key", get(vapid_public_key))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Browser `PushSubscription` JSON: key material arrives nested under `keys`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeRequest {
    endpoint: String,
    keys: SubscriptionKeys,
    owner_tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubscriptionKeys {
    p256dh: String,
    auth: String,
}

impl From<SubscribeRequest> for Subscription {
    fn from(req: SubscribeRequest) -> Self {
        Subscription {
            endpoint: req.endpoint,
            p256dh: req.keys.p256dh,
            auth: req.keys.auth,
            owner_tag: req.owner_tag,
        }
    }
}

async fn subscribe(
    State(state): State<SharedState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let sub: Subscription = req.into();
    state.registry.upsert(&sub).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Subscription saved." })),
    ))
}

#[derive(Debug, Deserialize)]
struct UnsubscribeRequest {
    endpoint: String,
}

async fn unsubscribe(
    State(state): State<SharedState>,
    Json(req): Json<UnsubscribeRequest>,
) -> Result<Json<Value>, ApiError> {
    let removed = state.registry.remove(&req.endpoint).await?;
    Ok(Json(json!({
        "message": "Subscription removed.",
        "removed": removed,
    })))
}

/// Broadcast request: display fields plus an optional owner scope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotifyRequest {
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
    owner_tag: Option<String>,
}

async fn notify(
    State(state): State<SharedState>,
    Json(req): Json<NotifyRequest>,
) -> Result<Json<Value>, ApiError> {
    let payload = NotificationPayload {
        title: req.title,
        body: req.body,
        url: req.url,
    };
    let filter = BroadcastFilter {
        owner_tag: req.owner_tag,
    };

    let summary = state.engine.broadcast(&payload, &filter).await?;
    info!(
        attempted = summary.attempted,
        sent = summary.sent,
        removed = summary.removed,
        "notify request served"
    );
    Ok(Json(json!({
        "message": "Notifications sent.",
        "attempted": summary.attempted,
        "sent": summary.sent,
        "removed": summary.removed,
    })))
}

async fn vapid_public_key(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "publicKey": state.vapid_public_key }))
}

async fn healthz() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<SharedState>) -> String {
    state.metrics.render()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
