//! Webhook ("ping") payloads.
//!
//! Gumroad posts one payload per registered [`ResourceName`]. Sale, refund,
//! dispute and dispute_won pings share the sale shape; the four subscription
//! lifecycle pings share a common subscriber block. Receiving and routing
//! pings is left to the caller; this module only decodes them.

use crate::purchase::Purchase;
use crate::resource::ResourceName;
use crate::{de, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of sale, refund, dispute and dispute_won pings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalePing {
    #[serde(default, deserialize_with = "de::flag")]
    pub is_recurring_charge: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_preorder_authorization: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_gift_receiver_purchase: bool,
    /// Set on pings sent from the seller dashboard's "send test ping".
    #[serde(default, deserialize_with = "de::flag")]
    pub test: bool,
    #[serde(default)]
    pub url_params: Value,
    #[serde(flatten)]
    pub purchase: Purchase,
}

/// Subscriber block shared by the lifecycle pings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPing {
    pub subscription_id: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub purchase_ids: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub charge_occurrence_count: Option<u64>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub free_trial_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub custom_fields: Value,
    #[serde(default)]
    pub license_key: Option<String>,
}

/// Payload of the `cancellation` ping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationPing {
    #[serde(flatten)]
    pub subscription: SubscriptionPing,
    #[serde(default, deserialize_with = "de::flag")]
    pub cancelled: bool,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::flag")]
    pub cancelled_by_admin: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub cancelled_by_buyer: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub cancelled_by_seller: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub cancelled_due_to_payment_failures: bool,
}

/// Direction of a plan change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanChange {
    Upgrade,
    Downgrade,
}

/// A membership tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub name: String,
}

/// A plan before or after a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSnapshot {
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default, deserialize_with = "de::amount")]
    pub price_cents: u64,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub quantity: Option<u64>,
}

/// Payload of the `subscription_updated` ping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionUpdatedPing {
    #[serde(flatten)]
    pub subscription: SubscriptionPing,
    #[serde(rename = "type")]
    pub change: PlanChange,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub effective_as_of: Option<DateTime<Utc>>,
    pub old_plan: PlanSnapshot,
    pub new_plan: PlanSnapshot,
}

/// Payload of the `subscription_ended` ping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionEndedPing {
    #[serde(flatten)]
    pub subscription: SubscriptionPing,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub ended_at: Option<DateTime<Utc>>,
    /// `cancelled`, `failed_payment` or `fixed_subscription_period_ended`.
    #[serde(default)]
    pub ended_reason: Option<String>,
}

/// Payload of the `subscription_restarted` ping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRestartedPing {
    #[serde(flatten)]
    pub subscription: SubscriptionPing,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub restarted_at: Option<DateTime<Utc>>,
}

/// A decoded webhook payload, tagged by the event it was registered for.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookPayload {
    Sale(SalePing),
    Refund(SalePing),
    Dispute(SalePing),
    DisputeWon(SalePing),
    Cancellation(CancellationPing),
    SubscriptionUpdated(SubscriptionUpdatedPing),
    SubscriptionEnded(SubscriptionEndedPing),
    SubscriptionRestarted(SubscriptionRestartedPing),
}

impl WebhookPayload {
    /// Decodes a ping body for the given event kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not match the event's shape.
    pub fn from_json(resource: ResourceName, body: Value) -> Result<Self> {
        let payload = match resource {
            ResourceName::Sale => Self::Sale(serde_json::from_value(body)?),
            ResourceName::Refund => Self::Refund(serde_json::from_value(body)?),
            ResourceName::Dispute => Self::Dispute(serde_json::from_value(body)?),
            ResourceName::DisputeWon => Self::DisputeWon(serde_json::from_value(body)?),
            ResourceName::Cancellation => Self::Cancellation(serde_json::from_value(body)?),
            ResourceName::SubscriptionUpdated => {
                Self::SubscriptionUpdated(serde_json::from_value(body)?)
            }
            ResourceName::SubscriptionEnded => {
                Self::SubscriptionEnded(serde_json::from_value(body)?)
            }
            ResourceName::SubscriptionRestarted => {
                Self::SubscriptionRestarted(serde_json::from_value(body)?)
            }
        };
        Ok(payload)
    }

    /// Returns the event kind this payload was decoded as.
    #[must_use]
    pub fn resource_name(&self) -> ResourceName {
        match self {
            Self::Sale(_) => ResourceName::Sale,
            Self::Refund(_) => ResourceName::Refund,
            Self::Dispute(_) => ResourceName::Dispute,
            Self::DisputeWon(_) => ResourceName::DisputeWon,
            Self::Cancellation(_) => ResourceName::Cancellation,
            Self::SubscriptionUpdated(_) => ResourceName::SubscriptionUpdated,
            Self::SubscriptionEnded(_) => ResourceName::SubscriptionEnded,
            Self::SubscriptionRestarted(_) => ResourceName::SubscriptionRestarted,
        }
    }

    /// Returns the subscription the ping refers to, if any.
    #[must_use]
    pub fn subscription_id(&self) -> Option<&str> {
        match self {
            Self::Sale(p) | Self::Refund(p) | Self::Dispute(p) | Self::DisputeWon(p) => {
                p.purchase.subscription_id.as_deref()
            }
            Self::Cancellation(p) => Some(&p.subscription.subscription_id),
            Self::SubscriptionUpdated(p) => Some(&p.subscription.subscription_id),
            Self::SubscriptionEnded(p) => Some(&p.subscription.subscription_id),
            Self::SubscriptionRestarted(p) => Some(&p.subscription.subscription_id),
        }
    }
}
