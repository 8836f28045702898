//! VAPID key handling for Web Push (RFC 8292).
//!
//! The private key is a P-256 ECDSA signing key stored as the raw 32-byte
//! scalar (base64url) — the format `web-push`'s
//! `VapidSignatureBuilder::from_base64` expects. The public key is the
//! uncompressed SEC1 point (65 bytes), handed to browsers as the
//! `applicationServerKey`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL};
use p256::ecdsa::SigningKey;
use p256::elliptic_curve::rand_core::OsRng;
use serde::{Deserialize, Serialize};

/// Errors raised while generating or validating VAPID keys.
#[derive(Debug, thiserror::Error)]
pub enum VapidError {
    /// Key material is not valid base64url.
    #[error("vapid {which} key is not valid base64url: {reason}")]
    Encoding {
        /// Which key was malformed ("public" or "private").
        which: &'static str,
        /// Decoder error description.
        reason: String,
    },
    /// Key material decoded to the wrong shape.
    #[error("vapid {which} key has wrong shape: {reason}")]
    Shape {
        /// Which key was malformed ("public" or "private").
        which: &'static str,
        /// What was expected.
        reason: String,
    },
}

/// A VAPID keypair for Web Push authentication.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VapidKeys {
    /// Raw 32-byte P-256 private key scalar (base64url).
    private_key_b64: String,
    /// Uncompressed SEC1 public key, 65 bytes decoded (base64url).
    public_key_b64: String,
}

impl VapidKeys {
    /// Generate a fresh keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        let verifying_key = signing_key.verifying_key();

        let public_point = verifying_key.to_encoded_point(false);
        Self {
            private_key_b64: BASE64URL.encode(signing_key.to_bytes().as_slice()),
            public_key_b64: BASE64URL.encode(public_point.as_bytes()),
        }
    }

    /// Reconstruct a keypair from its base64url parts, validating shapes:
    /// the public key must be a 65-byte uncompressed P-256 point and the
    /// private key a valid 32-byte scalar.
    pub fn from_base64url(public_key_b64: &str, private_key_b64: &str) -> Result<Self, VapidError> {
        let public_bytes = BASE64URL
            .decode(public_key_b64)
            .map_err(|e| VapidError::Encoding {
                which: "public",
                reason: e.to_string(),
            })?;
        if public_bytes.len() != 65 || public_bytes[0] != 0x04 {
            return Err(VapidError::Shape {
                which: "public",
                reason: format!(
                    "expected 65-byte uncompressed P-256 point, got {} bytes",
                    public_bytes.len()
                ),
            });
        }

        let private_bytes = BASE64URL
            .decode(private_key_b64)
            .map_err(|e| VapidError::Encoding {
                which: "private",
                reason: e.to_string(),
            })?;
        if private_bytes.len() != 32 {
            return Err(VapidError::Shape {
                which: "private",
                reason: format!("expected 32-byte scalar, got {} bytes", private_bytes.len()),
            });
        }
        let _ = SigningKey::from_bytes(private_bytes.as_slice().into()).map_err(|_| {
            VapidError::Shape {
                which: "private",
                reason: "not a valid P-256 scalar".to_string(),
            }
        })?;

        Ok(Self {
            private_key_b64: private_key_b64.to_string(),
            public_key_b64: public_key_b64.to_string(),
        })
    }

    /// Base64url public key, sent to browsers as `applicationServerKey`.
    pub fn public_key_base64url(&self) -> &str {
        &self.public_key_b64
    }

    /// Base64url raw private scalar, consumed by the transport for signing.
    pub fn private_key_base64url(&self) -> &str {
        &self.private_key_b64
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
