//! Settings loading: defaults ← user file ← environment.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::{Result, SettingsError};
use crate::types::FaroSettings;

/// Path of the user settings file: `~/.faro/settings.json`.
pub fn settings_path() -> PathBuf {
    home_dir().join(".faro").join("settings.json")
}

/// Resolve a leading `~/` in a configured path against the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    path.strip_prefix("~/")
        .map_or_else(|| PathBuf::from(path), |rest| home_dir().join(rest))
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// Load settings from the default path with env overrides applied.
pub fn load_settings() -> Result<FaroSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific file path with env overrides applied.
///
/// A missing file is not an error — defaults are used. A present but
/// unreadable or malformed file is an error: silently ignoring a file the
/// operator wrote would mask typos.
pub fn load_settings_from_path(path: &Path) -> Result<FaroSettings> {
    let mut settings = read_file_layer(path)?;
    apply_env_overrides(&mut settings, |var| std::env::var(var).ok())?;
    Ok(settings)
}

fn read_file_layer(path: &Path) -> Result<FaroSettings> {
    let defaults = serde_json::to_value(FaroSettings::default())?;

    let merged = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let file_value: Value = serde_json::from_str(&raw)?;
        debug!(?path, "merging settings file over defaults");
        deep_merge(defaults, file_value)
    } else {
        debug!(?path, "no settings file, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursively merge `overlay` onto `base`. Objects merge key-by-key;
/// any other value in the overlay replaces the base value outright.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_value) => deep_merge(base_value, overlay_value),
                    None => overlay_value,
                };
                let _ = base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// Apply `FARO_*` overrides (highest priority layer).
///
/// The variable source is injected so tests can drive this without touching
/// the process environment.
fn apply_env_overrides(
    settings: &mut FaroSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(port) = lookup("FARO_PORT") {
        settings.server.port = port.parse().map_err(|_| SettingsError::InvalidEnv {
            var: "FARO_PORT".to_string(),
            reason: format!("expected a port number, got {port:?}"),
        })?;
    }
    if let Some(db_path) = lookup("FARO_DB_PATH") {
        settings.store.db_path = db_path;
    }
    if let Some(key) = lookup("FARO_VAPID_PUBLIC_KEY") {
        settings.push.vapid_public_key = Some(key);
    }
    if let Some(key) = lookup("FARO_VAPID_PRIVATE_KEY") {
        settings.push.vapid_private_key = Some(key);
    }
    if let Some(subject) = lookup("FARO_PUSH_SUBJECT") {
        settings.push.subject = subject;
    }
    if let Some(cap) = lookup("FARO_MAX_CONCURRENT_DELIVERIES") {
        settings.push.max_concurrent_deliveries =
            cap.parse().map_err(|_| SettingsError::InvalidEnv {
                var: "FARO_MAX_CONCURRENT_DELIVERIES".to_string(),
                reason: format!("expected a positive integer, got {cap:?}"),
            })?;
    }
    if let Some(level) = lookup("FARO_LOG_LEVEL") {
        settings.logging.level = level;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fake_env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn deep_merge_combines_disjoint_keys() {
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"b": 2}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn deep_merge_overlay_wins_on_scalars() {
        let merged = deep_merge(
            serde_json::json!({"a": {"x": 1, "y": 2}}),
            serde_json::json!({"a": {"x": 10}}),
        );
        assert_eq!(merged["a"]["x"], 10);
        assert_eq!(merged["a"]["y"], 2);
    }

    #[test]
    fn deep_merge_replaces_arrays_wholesale() {
        let merged = deep_merge(
            serde_json::json!({"a": [1, 2, 3]}),
            serde_json::json!({"a": [9]}),
        );
        assert_eq!(merged["a"], serde_json::json!([9]));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let settings = load_settings_from_path(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn file_overrides_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server":{"port":8443},"push":{"subject":"ops@faro.example"}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.port, 8443);
        assert_eq!(settings.push.subject, "ops@faro.example");
        // Untouched sections keep their defaults.
        assert_eq!(settings.store.pool_size, 8);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(load_settings_from_path(&path).is_err());
    }

    #[test]
    fn env_beats_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server":{"port":8443}}"#).unwrap();

        let mut settings = read_file_layer(&path).unwrap();
        assert_eq!(settings.server.port, 8443);

        apply_env_overrides(&mut settings, fake_env(&[("FARO_PORT", "9999")])).unwrap();
        assert_eq!(settings.server.port, 9999);
    }

    #[test]
    fn invalid_env_port_is_an_error() {
        let mut settings = FaroSettings::default();
        let result =
            apply_env_overrides(&mut settings, fake_env(&[("FARO_PORT", "not-a-port")]));
        assert!(matches!(
            result,
            Err(SettingsError::InvalidEnv { var, .. }) if var == "FARO_PORT"
        ));
    }

    #[test]
    fn vapid_keys_and_subject_come_from_env() {
        let mut settings = FaroSettings::default();
        apply_env_overrides(
            &mut settings,
            fake_env(&[
                ("FARO_VAPID_PUBLIC_KEY", "pub_b64"),
                ("FARO_VAPID_PRIVATE_KEY", "priv_b64"),
                ("FARO_PUSH_SUBJECT", "ops@faro.example"),
            ]),
        )
        .unwrap();

        assert_eq!(settings.push.vapid_public_key.as_deref(), Some("pub_b64"));
        assert_eq!(settings.push.vapid_private_key.as_deref(), Some("priv_b64"));
        assert_eq!(settings.push.subject, "ops@faro.example");
    }

    #[test]
    fn concurrency_cap_parses_from_env() {
        let mut settings = FaroSettings::default();
        apply_env_overrides(
            &mut settings,
            fake_env(&[("FARO_MAX_CONCURRENT_DELIVERIES", "4")]),
        )
        .unwrap();
        assert_eq!(settings.push.max_concurrent_deliveries, 4);
    }

    #[test]
    fn expand_home_resolves_tilde() {
        let expanded = expand_home("~/.faro/subscriptions.db");
        assert!(expanded.ends_with(".faro/subscriptions.db"));
        assert!(!expanded.to_string_lossy().starts_with('~'));

        let absolute = expand_home("/var/lib/faro.db");
        assert_eq!(absolute, PathBuf::from("/var/lib/faro.db"));
    }
}
