//! A verified license and its lazily resolved subscription data.

use crate::cell::ResolveOnce;
use crate::client::GumroadClient;
use crate::error::{LicenseError, LicenseResult};
use gumroad_types::{
    LicenseVerification, Purchase, Subscription, SubscriptionCharges, SubscriptionStatus,
};
use std::sync::Arc;

/// Extra conditions a caller may want treated as invalid.
///
/// Accepted by [`License::is_valid`] but not evaluated yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvalidCases {
    /// Treat outstanding future charges as invalid.
    pub outstanding_payments: bool,
}

/// A license key resolved to the purchase that issued it.
///
/// The subscription and its charge history are fetched on first use and
/// cached for the life of this value. Nothing invalidates the cache; build a
/// new `License` to observe later changes.
#[derive(Debug)]
pub struct License {
    client: GumroadClient,
    verification: LicenseVerification,
    subscription: ResolveOnce<Subscription>,
    charges: ResolveOnce<Arc<SubscriptionCharges>>,
}

impl License {
    pub(crate) fn new(verification: LicenseVerification, client: GumroadClient) -> Self {
        Self {
            client,
            verification,
            subscription: ResolveOnce::new(),
            charges: ResolveOnce::new(),
        }
    }

    /// The purchase that carries the license key.
    #[must_use]
    pub fn purchase(&self) -> &Purchase {
        &self.verification.purchase
    }

    /// The license key, as recorded on the purchase.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.verification.purchase.license_key.as_deref()
    }

    /// How many times the key had been verified when this license was built.
    #[must_use]
    pub fn uses(&self) -> u64 {
        self.verification.uses
    }

    /// The subscription the license belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::NoSubscription`] for one-off purchases.
    pub fn subscription_id(&self) -> LicenseResult<&str> {
        self.verification
            .purchase
            .subscription_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(LicenseError::NoSubscription)
    }

    /// Every charge billed under the subscription, oldest first.
    pub async fn purchases(&self) -> LicenseResult<Vec<Purchase>> {
        Ok(self.resolve_charges().await?.recurring_purchases.clone())
    }

    /// Alias of [`License::purchases`].
    pub async fn charges(&self) -> LicenseResult<Vec<Purchase>> {
        self.purchases().await
    }

    /// Charges still to be billed on a fixed-length subscription.
    pub async fn remaining_charges_count(&self) -> LicenseResult<u64> {
        Ok(self.resolve_charges().await?.remaining_charges_count)
    }

    /// The subscriber record.
    pub async fn subscription(&self) -> LicenseResult<Subscription> {
        let id = self.subscription_id()?;
        self.subscription
            .get_or_resolve(|| self.client.get_subscription(id))
            .await
    }

    /// The subscription's lifecycle status.
    pub async fn status(&self) -> LicenseResult<SubscriptionStatus> {
        Ok(self.subscription().await?.status)
    }

    /// Succeeds only if the subscription is alive.
    ///
    /// The [`InvalidCases`] argument is accepted for forward compatibility
    /// and currently ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidSubscription`] carrying the observed
    /// status for every status other than `alive`.
    pub async fn is_valid(&self, _invalid_cases: Option<InvalidCases>) -> LicenseResult<()> {
        match self.status().await? {
            SubscriptionStatus::Alive => Ok(()),
            status => Err(LicenseError::InvalidSubscription(status)),
        }
    }

    /// Sum of `price` over every charge, in minor currency units.
    pub async fn total_revenue(&self) -> LicenseResult<u64> {
        Ok(self.resolve_charges().await?.total_price())
    }

    async fn resolve_charges(&self) -> LicenseResult<Arc<SubscriptionCharges>> {
        let id = self.subscription_id()?;
        self.charges
            .get_or_resolve(|| async move {
                self.client.get_subscription_charges(id).await.map(Arc::new)
            })
            .await
    }
}
