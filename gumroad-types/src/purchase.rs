//! Purchases (charges) and the license verification envelope.

use crate::de;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Card details attached to a purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Masked card number, e.g. `**** **** **** 4242`.
    #[serde(default)]
    pub visual: Option<String>,
    /// Card brand, e.g. `visa`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub expiry_month: Option<u32>,
    #[serde(default)]
    pub expiry_year: Option<u32>,
}

/// An offer code applied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCode {
    pub name: String,
    #[serde(default)]
    pub displayed_amount_off: Option<String>,
}

/// One billed transaction.
///
/// All monetary fields are integers in the smallest currency unit. Only the
/// first purchase of a subscription carries `license_key` / `license_id`;
/// later recurring charges leave them empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sale_id: Option<String>,
    #[serde(default)]
    pub seller_id: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub product_permalink: Option<String>,
    #[serde(default)]
    pub short_product_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub purchase_email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub purchaser_id: Option<String>,
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default, alias = "order_id", deserialize_with = "de::opt_amount")]
    pub order_number: Option<u64>,

    /// Charged amount in minor currency units.
    #[serde(default, deserialize_with = "de::amount")]
    pub price: u64,
    /// Platform fee in minor currency units.
    #[serde(default, deserialize_with = "de::amount")]
    pub gumroad_fee: u64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::opt_amount")]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub amount_refundable_in_currency: Option<String>,

    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub sale_timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurrence: Option<String>,
    /// Variant selection. A display string on the verify endpoint, an object
    /// on the charge history endpoint.
    #[serde(default)]
    pub variants: Value,
    #[serde(default)]
    pub offer_code: Option<OfferCode>,
    #[serde(default)]
    pub card: Option<Card>,
    /// Custom checkout fields. An array of strings or an object depending on
    /// the endpoint.
    #[serde(default)]
    pub custom_fields: Value,
    #[serde(default)]
    pub ip_country: Option<String>,
    #[serde(default)]
    pub referrer: Option<String>,

    #[serde(default)]
    pub license_key: Option<String>,
    #[serde(default)]
    pub license_id: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    pub license_disabled: bool,

    #[serde(default, deserialize_with = "de::flag")]
    pub refunded: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub partially_refunded: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub disputed: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub dispute_won: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub chargedback: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub cancelled: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub ended: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub dead: bool,
    #[serde(default, deserialize_with = "de::flag")]
    pub recurring_charge: bool,

    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub subscription_cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub subscription_ended_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_timestamp")]
    pub subscription_failed_at: Option<DateTime<Utc>>,

    /// Every other key, including custom fields that the verify endpoint
    /// inlines at the top level (e.g. `"Github Username"`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Purchase {
    /// Returns true if this purchase carries a license key.
    #[must_use]
    pub fn has_license_key(&self) -> bool {
        self.license_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Price minus the platform fee, saturating at zero.
    #[must_use]
    pub fn net_amount(&self) -> u64 {
        self.price.saturating_sub(self.gumroad_fee)
    }

    /// Returns true if the money for this purchase was taken back.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.refunded || (self.disputed && !self.dispute_won) || self.chargedback
    }

    /// Looks up a custom checkout field by its label.
    ///
    /// Checks the `custom_fields` object first, then keys inlined at the top
    /// level of the purchase.
    #[must_use]
    pub fn custom_field(&self, name: &str) -> Option<&Value> {
        self.custom_fields
            .as_object()
            .and_then(|fields| fields.get(name))
            .or_else(|| self.extra.get(name))
    }
}

/// Response of `POST /licenses/verify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseVerification {
    /// How many times the key has been verified.
    #[serde(default, deserialize_with = "de::amount")]
    pub uses: u64,
    /// The purchase that issued the license key.
    pub purchase: Purchase,
}
