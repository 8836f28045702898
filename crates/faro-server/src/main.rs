//! faro-server binary: configuration, wiring, and the HTTP listener.

mod error;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{info, warn};

use faro_push::{BroadcastEngine, VapidKeys, WebPushConfig, WebPushTransport};
use faro_settings::{FaroSettings, LoggingSettings, PushSettings};
use faro_store::{ConnectionConfig, SubscriptionStore};

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = faro_settings::load_settings().context("failed to load settings")?;
    init_tracing(&settings.logging);

    let metrics = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;

    let vapid = ensure_vapid_keys(&settings.push)?;
    let registry = Arc::new(open_store(&settings)?);
    let transport = Arc::new(
        WebPushTransport::new(WebPushConfig {
            vapid_private_key: vapid.private_key_base64url().to_string(),
            subject: settings.push.subject.clone(),
            ttl_secs: settings.push.ttl_secs,
            request_timeout: Duration::from_secs(settings.push.request_timeout_secs),
        })
        .context("failed to build push transport")?,
    );
    let engine = BroadcastEngine::new(Arc::clone(&registry), transport)
        .with_max_in_flight(settings.push.max_concurrent_deliveries);

    let app = routes::router(Arc::new(AppState {
        registry,
        engine,
        vapid_public_key: vapid.public_key_base64url().to_string(),
        metrics,
    }));

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        addr = %addr,
        vapid_public_key = vapid.public_key_base64url(),
        "faro listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingSettings) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.clone()));

    if logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Open the subscription store selected by settings.
///
/// An empty `dbPath` selects a file-less run — subscriptions are lost on
/// restart, which is fine for local development.
fn open_store(settings: &FaroSettings) -> anyhow::Result<SubscriptionStore> {
    let config = ConnectionConfig {
        pool_size: settings.store.pool_size,
        busy_timeout_ms: settings.store.busy_timeout_ms,
    };

    if settings.store.db_path.is_empty() {
        warn!("no dbPath configured, subscriptions will not survive restarts");
        return SubscriptionStore::in_memory().context("failed to open in-memory store");
    }

    let path = faro_settings::expand_home(&settings.store.db_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let path = path.to_string_lossy();
    info!(db_path = %path, "opening subscription store");
    SubscriptionStore::open(&path, &config)
        .with_context(|| format!("failed to open subscription store at {path}"))
}

/// Use the configured VAPID keypair, or generate one on first boot.
///
/// Generated keys are written back to `~/.faro/settings.json` so browsers
/// subscribed against the public key stay valid across restarts.
fn ensure_vapid_keys(push: &PushSettings) -> anyhow::Result<VapidKeys> {
    if let (Some(public), Some(private)) = (&push.vapid_public_key, &push.vapid_private_key) {
        return VapidKeys::from_base64url(public, private)
            .context("configured VAPID keys are invalid");
    }

    let keys = VapidKeys::generate();
    let path = faro_settings::settings_path();
    persist_generated_keys(&keys, &path)
        .with_context(|| format!("failed to persist generated VAPID keys to {}", path.display()))?;
    warn!(
        path = %path.display(),
        "no VAPID keys configured; generated a fresh pair and saved them"
    );
    Ok(keys)
}

/// Merge the generated keys into the settings file, preserving whatever else
/// the operator has written there.
fn persist_generated_keys(keys: &VapidKeys, path: &std::path::Path) -> anyhow::Result<()> {
    let current: serde_json::Value = match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).context("existing settings file is not valid JSON")?,
        Err(_) => serde_json::json!({}),
    };

    let merged = faro_settings::deep_merge(
        current,
        serde_json::json!({
            "push": {
                "vapidPublicKey": keys.public_key_base64url(),
                "vapidPrivateKey": keys.private_key_base64url(),
            }
        }),
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&merged)?)?;
    Ok(())
}

/// Resolve when the process receives SIGINT.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received, draining");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
