//! Push subscriptions and broadcast filters.

use serde::{Deserialize, Serialize};

use crate::errors::RegistryError;

/// A browser's push subscription.
///
/// Contains everything the delivery transport needs to send an encrypted
/// web push message to this destination. The `endpoint` URL is the identity:
/// the registry keeps at most one entry per endpoint, and a repeat subscribe
/// from the same endpoint overwrites the key material (browsers rotate keys).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Push service endpoint URL (unique identity).
    pub endpoint: String,
    /// Client's P-256 ECDH public key (base64url).
    pub p256dh: String,
    /// Shared auth secret (base64url).
    pub auth: String,
    /// Optional application-level scope, used only for filtering broadcasts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_tag: Option<String>,
}

impl Subscription {
    /// Validate the subscription at the registry boundary.
    ///
    /// The endpoint must be an absolute `http(s)` URL and both key fields
    /// must be present. Key material is otherwise opaque — the push service
    /// rejects bad keys at delivery time, which the engine classifies like
    /// any other failure.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.endpoint.is_empty() {
            return Err(RegistryError::validation("endpoint is empty"));
        }
        if !self.endpoint.starts_with("https://") && !self.endpoint.starts_with("http://") {
            return Err(RegistryError::validation(format!(
                "endpoint is not an absolute http(s) URL: {}",
                crate::text::compact_endpoint(&self.endpoint)
            )));
        }
        if self.p256dh.is_empty() {
            return Err(RegistryError::validation("p256dh key is empty"));
        }
        if self.auth.is_empty() {
            return Err(RegistryError::validation("auth secret is empty"));
        }
        Ok(())
    }
}

/// Selects which subscriptions a broadcast targets.
///
/// `owner_tag: Some(tag)` targets only subscriptions whose `owner_tag`
/// equals `tag`; unscoped subscriptions (no tag) never match a filtered
/// broadcast. `None` targets everyone, scoped or not. An empty match set
/// is a valid outcome, not an error.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastFilter {
    /// Equality predicate on [`Subscription::owner_tag`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_tag: Option<String>,
}

impl BroadcastFilter {
    /// Filter that targets every subscription.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter that targets subscriptions scoped to `tag`.
    pub fn owner(tag: impl Into<String>) -> Self {
        Self {
            owner_tag: Some(tag.into()),
        }
    }

    /// Whether `sub` is targeted by this filter.
    pub fn matches(&self, sub: &Subscription) -> bool {
        match &self.owner_tag {
            Some(tag) => sub.owner_tag.as_deref() == Some(tag.as_str()),
            None => true,
        }
    }
}
