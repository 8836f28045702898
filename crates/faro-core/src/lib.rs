//! # faro-core
//!
//! Foundation types and traits for the faro push-broadcast service.
//!
//! This crate provides the shared vocabulary the other faro crates depend on:
//!
//! - **Subscriptions**: [`Subscription`] with boundary validation,
//!   [`BroadcastFilter`] for scoped broadcasts
//! - **Notifications**: [`NotificationPayload`] with fixed display defaults
//! - **Delivery**: [`DeliveryOutcome`], [`DeliveryStatus`], [`BroadcastSummary`]
//! - **Registry**: the [`SubscriptionRegistry`] trait implemented by `faro-store`
//! - **Errors**: [`RegistryError`] taxonomy via `thiserror`
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other faro crates.

#![deny(unsafe_code)]

pub mod delivery;
pub mod errors;
pub mod notification;
pub mod registry;
pub mod subscription;
pub mod text;

pub use delivery::{BroadcastSummary, DeliveryOutcome, DeliveryStatus};
pub use errors::RegistryError;
pub use notification::NotificationPayload;
pub use registry::SubscriptionRegistry;
pub use subscription::{BroadcastFilter, Subscription};
