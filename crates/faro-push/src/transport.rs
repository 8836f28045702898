//! Push delivery transport: the seam between the engine and the wire.
//!
//! The engine never sees HTTP. It hands a subscriber and a serialized
//! payload to a [`PushTransport`] and gets back a [`PushOutcome`] — a
//! classification, not an error, because a failed delivery is ordinary data
//! to a broadcast.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use web_push::{ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessageBuilder};

use faro_core::Subscription;
use faro_core::text::compact_endpoint;

/// Classified result of one transport delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// The push service accepted the message (HTTP 2xx, normally 201).
    Accepted,
    /// The endpoint is permanently invalid (HTTP 404 or 410) and should be
    /// pruned from the registry.
    Gone,
    /// Any other failure: request build error, network error, other
    /// 4xx/5xx. The subscription is kept; no retry within the broadcast.
    Failed {
        /// Human-readable failure description for logs.
        reason: String,
    },
}

/// Delivers one encrypted push message to one subscriber.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Attempt delivery of `payload` to `sub`. Never fails — failures are
    /// classified into the returned outcome.
    async fn deliver(&self, sub: &Subscription, payload: &[u8]) -> PushOutcome;
}

/// Configuration for [`WebPushTransport`].
#[derive(Clone, Debug)]
pub struct WebPushConfig {
    /// VAPID private key: base64url raw 32-byte P-256 scalar.
    pub vapid_private_key: String,
    /// Contact for the VAPID `sub` claim (email, without `mailto:`).
    pub subject: String,
    /// Message TTL in seconds.
    pub ttl_secs: u32,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

/// RFC 8030 Web Push transport.
///
/// Uses the `web-push` crate for VAPID signing and RFC 8291 payload
/// encryption, then sends the HTTP request through a shared
/// `reqwest::Client` so deliveries reuse pooled connections.
pub struct WebPushTransport {
    config: WebPushConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for WebPushTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebPushTransport")
            .field("subject", &self.config.subject)
            .field("ttl_secs", &self.config.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl WebPushTransport {
    /// Build a transport with its own HTTP client.
    pub fn new(config: WebPushConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// Encrypt and sign `payload` for `sub`, producing the wire message.
    fn build_message(
        &self,
        sub: &Subscription,
        payload: &[u8],
    ) -> Result<web_push::WebPushMessage, web_push::WebPushError> {
        let sub_info = SubscriptionInfo::new(&sub.endpoint, &sub.p256dh, &sub.auth);

        let mut sig_builder =
            VapidSignatureBuilder::from_base64(&self.config.vapid_private_key, &sub_info)?;
        sig_builder.add_claim("sub", format!("mailto:{}", self.config.subject));
        let signature = sig_builder.build()?;

        let mut builder = WebPushMessageBuilder::new(&sub_info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload);
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.config.ttl_secs);
        builder.build()
    }

    /// Send a built message, mapping the HTTP status to a [`PushOutcome`].
    async fn send_message(&self, message: web_push::WebPushMessage) -> PushOutcome {
        let mut request = self
            .client
            .post(message.endpoint.to_string())
            .header("TTL", message.ttl.to_string());

        if let Some(payload) = message.payload {
            request = request
                .header("Content-Encoding", payload.content_encoding.to_str())
                .header("Content-Type", "application/octet-stream");
            for (key, value) in &payload.crypto_headers {
                request = request.header(*key, value.as_str());
            }
            request = request.body(payload.content);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return PushOutcome::Failed {
                    reason: format!("http request failed: {e}"),
                };
            }
        };

        let status = response.status().as_u16();
        match status {
            200..=299 => PushOutcome::Accepted,
            404 | 410 => PushOutcome::Gone,
            _ => {
                let body = response.text().await.unwrap_or_default();
                PushOutcome::Failed {
                    reason: format!("push service returned {status}: {body}"),
                }
            }
        }
    }
}

#[async_trait]
impl PushTransport for WebPushTransport {
    async fn deliver(&self, sub: &Subscription, payload: &[u8]) -> PushOutcome {
        let message = match self.build_message(sub, payload) {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    endpoint = %compact_endpoint(&sub.endpoint),
                    error = %e,
                    "failed to build push message"
                );
                return PushOutcome::Failed {
                    reason: format!("message build failed: {e}"),
                };
            }
        };

        let outcome = self.send_message(message).await;
        debug!(
            endpoint = %compact_endpoint(&sub.endpoint),
            outcome = ?outcome,
            "delivery attempt settled"
        );
        outcome
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
