//! Notification payloads and their display defaults.

use serde::{Deserialize, Serialize};

/// Default title when the caller provides none.
pub const DEFAULT_TITLE: &str = "¡Nueva Contratación Disponible!";
/// Default body when the caller provides none.
pub const DEFAULT_BODY: &str =
    "Revisa los detalles de la última incorporación a nuestro equipo.";
/// Default in-app route when the caller provides none.
pub const DEFAULT_URL: &str = "/";

/// Display content of a broadcast notification.
///
/// All fields are optional on the wire; absent fields resolve to the fixed
/// defaults above when the payload is serialized for delivery. The defaults
/// are product policy, not placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Notification title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Notification body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// In-app route to open when the notification is tapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NotificationPayload {
    /// Resolved title (default applied).
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Resolved body (default applied).
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or(DEFAULT_BODY)
    }

    /// Resolved URL (default applied).
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_URL)
    }

    /// Serialize to the JSON wire form sent to subscribers, with defaults
    /// applied to every absent field.
    pub fn to_wire_json(&self) -> serde_json::Value {
        serde_json::json!({
            "title": self.title(),
            "body": self.body(),
            "url": self.url(),
        })
    }
}
