//! Subscriber records and their lifecycle status.

use crate::purchase::Purchase;
use crate::{de, Error};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Billing is current.
    Alive,
    /// A charge failed and is being retried.
    PendingFailure,
    /// Retries were exhausted.
    FailedPayment,
    /// A fixed-length subscription ran all of its charges.
    FixedSubscriptionPeriodEnded,
    /// Cancelled by the buyer, the seller, or an admin.
    Cancelled,
}

impl SubscriptionStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [SubscriptionStatus; 5] = [
        Self::Alive,
        Self::PendingFailure,
        Self::FailedPayment,
        Self::FixedSubscriptionPeriodEnded,
        Self::Cancelled,
    ];

    /// Returns the wire name of this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alive => "alive",
            Self::PendingFailure => "pending_failure",
            Self::FailedPayment => "failed_payment",
            Self::FixedSubscriptionPeriodEnded => "fixed_subscription_period_ended",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true only for [`SubscriptionStatus::Alive`].
    #[must_use]
    pub fn is_alive(&self) -> bool {
        matches!(self, Self::Alive)
    }

    /// Returns true if the subscription will not bill again.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(
            self,
            Self::FailedPayment | Self::FixedSubscriptionPeriodEnded | Self::Cancelled
        )
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::UnknownStatus(s.to_string()))
    }
}

/// A subscriber record: one recurring billing relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    /// Ids of every purchase billed under this subscription, oldest first.
    #[serde(default)]
    pub purchase_ids: Vec<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub user_requested_cancellation_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub charge_occurrence_count: Option<u64>,
    #[serde(default)]
    pub recurrence: Option<String>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub free_trial_ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub license_key: Option<String>,
    pub status: SubscriptionStatus,
}

impl Subscription {
    /// When the subscription stopped billing, if it has.
    #[must_use]
    pub fn terminated_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at.or(self.failed_at).or(self.cancelled_at)
    }

    /// Returns false if `ended_at` is set on a subscription whose status says
    /// it is still billing.
    #[must_use]
    pub fn has_consistent_timestamps(&self) -> bool {
        self.ended_at.is_none() || self.status.is_terminated()
    }
}

/// Charge history of one subscription, as returned by the application host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionCharges {
    /// Charges still to be billed on a fixed-length subscription.
    #[serde(default, deserialize_with = "de::amount")]
    pub remaining_charges_count: u64,
    #[serde(default, deserialize_with = "de::flag")]
    pub fixed_length_subscription: bool,
    /// Every charge billed so far, oldest first.
    #[serde(default)]
    pub recurring_purchases: Vec<Purchase>,
}

impl SubscriptionCharges {
    /// Sum of `price` over every charge.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        self.recurring_purchases
            .iter()
            .fold(0u64, |total, p| total.saturating_add(p.price))
    }
}
