//! Resource models for the Gumroad licensing and subscription API.
//!
//! This crate defines the passive data shapes exchanged with Gumroad:
//! - Purchases (charges) and the license verification envelope
//! - Subscriber records and their lifecycle status
//! - Resource subscriptions (webhook registrations) and event kinds
//! - Webhook ("ping") payloads for every event kind
//!
//! The shapes follow Gumroad's wire format. They carry no behavior beyond
//! small derived accessors; fetching and resolution live in
//! `gumroad-license`.

mod de;
mod purchase;
mod resource;
mod subscription;
mod webhook;

pub use purchase::{Card, LicenseVerification, OfferCode, Purchase};
pub use resource::{ResourceName, ResourceSubscription};
pub use subscription::{Subscription, SubscriptionCharges, SubscriptionStatus};
pub use webhook::{
    CancellationPing, PlanChange, PlanSnapshot, SalePing, SubscriptionEndedPing,
    SubscriptionPing, SubscriptionRestartedPing, SubscriptionUpdatedPing, Tier, WebhookPayload,
};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding Gumroad resources.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown subscription status: {0}")]
    UnknownStatus(String),

    #[error("unknown resource name: {0}")]
    UnknownResource(String),
}
