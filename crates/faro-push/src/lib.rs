//! # faro-push
//!
//! Web Push delivery and broadcast fan-out for the faro service.
//!
//! - [`PushTransport`] — the delivery seam: one encrypted send per
//!   subscriber, returning a classified [`PushOutcome`] instead of an error
//! - [`WebPushTransport`] — RFC 8030 implementation: VAPID signing and
//!   RFC 8291 payload encryption via the `web-push` crate, HTTP via `reqwest`
//! - [`BroadcastEngine`] — snapshot, capped concurrent fan-out, outcome
//!   classification, inline pruning of permanently-dead endpoints
//! - [`summarize`] — pure aggregation of per-subscriber outcomes
//! - [`VapidKeys`] — P-256 keypair generation and validation

#![deny(unsafe_code)]

pub mod engine;
pub mod summary;
pub mod transport;
pub mod vapid;

pub use engine::BroadcastEngine;
pub use summary::summarize;
pub use transport::{PushOutcome, PushTransport, WebPushConfig, WebPushTransport};
pub use vapid::{VapidError, VapidKeys};
