//! Resource subscriptions (webhook registrations).

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform event kinds a webhook can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceName {
    Sale,
    Refund,
    Dispute,
    DisputeWon,
    Cancellation,
    SubscriptionUpdated,
    SubscriptionEnded,
    SubscriptionRestarted,
}

impl ResourceName {
    pub const ALL: [ResourceName; 8] = [
        Self::Sale,
        Self::Refund,
        Self::Dispute,
        Self::DisputeWon,
        Self::Cancellation,
        Self::SubscriptionUpdated,
        Self::SubscriptionEnded,
        Self::SubscriptionRestarted,
    ];

    /// Returns the wire name of this event kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Refund => "refund",
            Self::Dispute => "dispute",
            Self::DisputeWon => "dispute_won",
            Self::Cancellation => "cancellation",
            Self::SubscriptionUpdated => "subscription_updated",
            Self::SubscriptionEnded => "subscription_ended",
            Self::SubscriptionRestarted => "subscription_restarted",
        }
    }

    /// Returns true for events whose payload is a sale record.
    #[must_use]
    pub fn is_sale_shaped(&self) -> bool {
        matches!(
            self,
            Self::Sale | Self::Refund | Self::Dispute | Self::DisputeWon
        )
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::UnknownResource(s.to_string()))
    }
}

/// A webhook registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSubscription {
    pub id: String,
    pub resource_name: ResourceName,
    pub post_url: String,
}
