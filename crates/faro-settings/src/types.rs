//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and implement
//! [`Default`] with production values. `#[serde(default)]` allows partial
//! JSON files — missing fields fall back to their defaults during
//! deserialization.

use serde::{Deserialize, Serialize};

/// Root settings type for the faro service.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaroSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Subscription store settings.
    pub store: StoreSettings,
    /// Push delivery settings.
    pub push: PushSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for FaroSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            store: StoreSettings::default(),
            push: PushSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// HTTP server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// TCP port to listen on.
    pub port: u16,
    /// Bind address.
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 5000,
            bind: "0.0.0.0".to_string(),
        }
    }
}

/// Subscription store settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// `SQLite` database file path. Empty selects the in-memory registry.
    pub db_path: String,
    /// Connection pool size.
    pub pool_size: u32,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: "~/.faro/subscriptions.db".to_string(),
            pool_size: 8,
            busy_timeout_ms: 5_000,
        }
    }
}

/// Push delivery settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PushSettings {
    /// VAPID public key (base64url, 65-byte uncompressed P-256 point).
    /// Generated and persisted on first boot when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vapid_public_key: Option<String>,
    /// VAPID private key (base64url, raw 32-byte P-256 scalar).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vapid_private_key: Option<String>,
    /// Contact for the VAPID `sub` claim, e.g. `admin@example.com`.
    pub subject: String,
    /// Push message TTL in seconds.
    pub ttl_secs: u32,
    /// Cap on simultaneous transport calls per broadcast.
    pub max_concurrent_deliveries: usize,
    /// Per-delivery HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            vapid_public_key: None,
            vapid_private_key: None,
            subject: "admin@example.com".to_string(),
            ttl_secs: 86_400,
            max_concurrent_deliveries: 32,
            request_timeout_secs: 30,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default tracing filter (overridden by `RUST_LOG`).
    pub level: String,
    /// Emit JSON log lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        let settings = FaroSettings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.bind, "0.0.0.0");
        assert_eq!(settings.store.pool_size, 8);
        assert_eq!(settings.push.ttl_secs, 86_400);
        assert_eq!(settings.push.max_concurrent_deliveries, 32);
        assert!(settings.push.vapid_public_key.is_none());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn partial_json_fills_missing_fields_with_defaults() {
        let settings: FaroSettings =
            serde_json::from_str(r#"{"server":{"port":9090}}"#).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.bind, "0.0.0.0");
        assert_eq!(settings.push.max_concurrent_deliveries, 32);
    }

    #[test]
    fn field_names_are_camel_case() {
        let json = serde_json::to_value(FaroSettings::default()).unwrap();
        assert!(json["store"].get("dbPath").is_some());
        assert!(json["push"].get("maxConcurrentDeliveries").is_some());
        assert!(json["push"].get("max_concurrent_deliveries").is_none());
    }

    #[test]
    fn absent_vapid_keys_are_omitted_from_json() {
        let json = serde_json::to_value(FaroSettings::default()).unwrap();
        assert!(json["push"].get("vapidPublicKey").is_none());
    }
}
