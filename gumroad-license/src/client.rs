//! High-level Gumroad operations.

use crate::config::{ClientConfig, Credentials};
use crate::error::{LicenseError, LicenseResult};
use crate::http::{HttpBackend, Method, ReqwestBackend};
use crate::license::License;
use crate::transport::{success_flag, Transport};
use gumroad_types::{
    LicenseVerification, Purchase, ResourceName, ResourceSubscription, Subscription,
    SubscriptionCharges,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Gateway to the Gumroad API.
///
/// Holds only credentials and an optional default product id. Cloning is
/// cheap; clones share the same transport.
#[derive(Clone)]
pub struct GumroadClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Transport,
    product_id: Option<String>,
}

impl GumroadClient {
    /// Creates a client that talks to Gumroad over `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: Credentials, config: ClientConfig) -> LicenseResult<Self> {
        let backend = ReqwestBackend::new(config.timeout())?;
        Ok(Self::with_backend(Arc::new(backend), credentials, config))
    }

    /// Creates a client over a caller-supplied HTTP backend.
    pub fn with_backend(
        backend: Arc<dyn HttpBackend>,
        credentials: Credentials,
        config: ClientConfig,
    ) -> Self {
        let transport = Transport::new(backend, credentials, &config);
        let product_id = config.product_id.filter(|id| !id.is_empty());
        Self {
            inner: Arc::new(ClientInner {
                transport,
                product_id,
            }),
        }
    }

    /// The product used when a call does not name one.
    #[must_use]
    pub fn default_product_id(&self) -> Option<&str> {
        self.inner.product_id.as_deref()
    }

    fn transport(&self) -> &Transport {
        &self.inner.transport
    }

    fn product_id<'a>(&'a self, product_id: Option<&'a str>) -> LicenseResult<&'a str> {
        product_id
            .filter(|id| !id.is_empty())
            .or(self.default_product_id())
            .ok_or_else(|| LicenseError::Config("no product id provided".to_string()))
    }

    // ── Licenses ────────────────────────────────────────────────

    /// Verifies a license key without wrapping it in a [`License`].
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] before any request if no product id
    /// is available, and [`LicenseError::Api`] if Gumroad rejects the key.
    pub async fn verify_license(
        &self,
        license_key: &str,
        product_id: Option<&str>,
    ) -> LicenseResult<LicenseVerification> {
        let product_id = self.product_id(product_id)?;
        let body = self
            .transport()
            .authenticated(
                Method::Post,
                "licenses/verify",
                json!({
                    "product_permalink": product_id,
                    "license_key": license_key,
                }),
            )
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Verifies a license key and returns a lazily resolving [`License`].
    ///
    /// # Errors
    ///
    /// See [`GumroadClient::verify_license`].
    pub async fn get_license(
        &self,
        license_key: &str,
        product_id: Option<&str>,
    ) -> LicenseResult<License> {
        let verification = self.verify_license(license_key, product_id).await?;
        debug!(uses = verification.uses, "license verified");
        Ok(License::new(verification, self.clone()))
    }

    // ── Purchases (cookie-authenticated) ────────────────────────

    /// The full charge history of a subscription.
    pub async fn get_subscription_charges(
        &self,
        subscription_id: &str,
    ) -> LicenseResult<SubscriptionCharges> {
        let endpoint = format!(
            "customers/subscription_recurring_purchases/{}",
            urlencoding::encode(subscription_id)
        );
        let body = self
            .transport()
            .with_cookie(Method::Get, &endpoint, Value::Null)
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Every recurring purchase of a subscription, oldest first.
    pub async fn get_subscription_purchases(
        &self,
        subscription_id: &str,
    ) -> LicenseResult<Vec<Purchase>> {
        Ok(self
            .get_subscription_charges(subscription_id)
            .await?
            .recurring_purchases)
    }

    /// Free-text or email search across the seller's purchases.
    ///
    /// Only the first purchase of each subscription carries a
    /// `license_key`; recurring charges in the results do not.
    pub async fn search_purchases(&self, query: &str) -> LicenseResult<Vec<Purchase>> {
        let body = self
            .transport()
            .with_cookie(Method::Get, "customers/search", json!({ "query": query }))
            .await?;

        match body {
            Value::Array(_) => Ok(serde_json::from_value(body)?),
            Value::Object(mut fields) => match fields.remove("purchases") {
                Some(purchases) => Ok(serde_json::from_value(purchases)?),
                None => Err(LicenseError::UnexpectedResponse(
                    "search response has no purchases".to_string(),
                )),
            },
            other => Err(LicenseError::UnexpectedResponse(format!(
                "search response is not a list: {other}"
            ))),
        }
    }

    // ── Subscribers ─────────────────────────────────────────────

    /// Subscriber records of a product, optionally filtered by email.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] if no product id is available.
    pub async fn get_subscriptions(
        &self,
        email: Option<&str>,
        product_id: Option<&str>,
    ) -> LicenseResult<Vec<Subscription>> {
        let product_id = self.product_id(product_id)?;
        let endpoint = format!("products/{}/subscribers", urlencoding::encode(product_id));
        let body = self
            .transport()
            .authenticated(Method::Get, &endpoint, json!({ "email": email }))
            .await?;
        take_field(body, "subscribers")
    }

    /// Returns true if `email` has at least one subscriber record for the
    /// product. An empty list is `false`, not an error.
    pub async fn email_is_subscriber(
        &self,
        email: &str,
        product_id: Option<&str>,
    ) -> LicenseResult<bool> {
        let subscribers = self.get_subscriptions(Some(email), product_id).await?;
        Ok(!subscribers.is_empty())
    }

    /// One subscriber record.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Request`] with the raw body attached if the
    /// payload reports `success: false`.
    pub async fn get_subscription(&self, subscription_id: &str) -> LicenseResult<Subscription> {
        let endpoint = format!("subscribers/{}", urlencoding::encode(subscription_id));
        let response = self
            .transport()
            .authenticated_raw(Method::Get, &endpoint, Value::Null)
            .await?;

        match success_flag(&response.body) {
            Some(true) if response.status == 200 => take_field(response.body, "subscriber"),
            Some(false) => {
                let message = response
                    .body
                    .get("message")
                    .and_then(Value::as_str)
                    .map_or_else(
                        || format!("subscriber {subscription_id} lookup failed"),
                        str::to_string,
                    );
                Err(LicenseError::Request {
                    message,
                    response: response.body,
                })
            }
            success => Err(LicenseError::Api {
                status: response.status,
                success,
            }),
        }
    }

    // ── Resource subscriptions (webhooks) ───────────────────────

    /// Registered webhooks, optionally only those for one event kind.
    pub async fn get_resource_subscriptions(
        &self,
        resource_name: Option<ResourceName>,
    ) -> LicenseResult<Vec<ResourceSubscription>> {
        let body = self
            .transport()
            .authenticated(
                Method::Get,
                "resource_subscriptions",
                json!({ "resource_name": resource_name }),
            )
            .await?;
        take_field(body, "resource_subscriptions")
    }

    /// Returns the registration for `(resource_name, post_url)`, creating it
    /// if none exists.
    ///
    /// Two callers racing on the same pair may both create one.
    pub async fn ensure_resource_subscription(
        &self,
        resource_name: ResourceName,
        post_url: &str,
    ) -> LicenseResult<ResourceSubscription> {
        let existing = self.get_resource_subscriptions(Some(resource_name)).await?;
        if let Some(found) = existing
            .into_iter()
            .find(|s| s.resource_name == resource_name && s.post_url == post_url)
        {
            debug!(id = %found.id, %resource_name, "resource subscription already registered");
            return Ok(found);
        }
        self.create_resource_subscription(resource_name, post_url)
            .await
    }

    /// Registers a webhook.
    pub async fn create_resource_subscription(
        &self,
        resource_name: ResourceName,
        post_url: &str,
    ) -> LicenseResult<ResourceSubscription> {
        let body = self
            .transport()
            .authenticated(
                Method::Put,
                "resource_subscriptions",
                json!({
                    "resource_name": resource_name,
                    "post_url": post_url,
                }),
            )
            .await?;
        let created: ResourceSubscription = take_field(body, "resource_subscription")?;
        info!(id = %created.id, %resource_name, "registered resource subscription");
        Ok(created)
    }

    /// Removes a webhook registration.
    pub async fn delete_resource_subscription(&self, id: &str) -> LicenseResult<()> {
        let endpoint = format!("resource_subscriptions/{}", urlencoding::encode(id));
        self.transport()
            .authenticated(Method::Delete, &endpoint, Value::Null)
            .await?;
        info!(id, "deleted resource subscription");
        Ok(())
    }
}

impl fmt::Debug for GumroadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GumroadClient")
            .field("transport", &self.inner.transport)
            .field("product_id", &self.inner.product_id)
            .finish()
    }
}

fn take_field<T: DeserializeOwned>(mut body: Value, key: &str) -> LicenseResult<T> {
    let value = body
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| LicenseError::UnexpectedResponse(format!("missing `{key}`")))?;
    Ok(serde_json::from_value(value)?)
}
