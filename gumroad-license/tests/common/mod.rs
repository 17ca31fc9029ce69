//! Shared test helpers for client and license tests.

#![allow(dead_code)]

use async_trait::async_trait;
use gumroad_license::http::{HttpBackend, HttpRequest, HttpResponse, Method};
use gumroad_license::{ClientConfig, Credentials, GumroadClient, LicenseError, LicenseResult};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const ACCESS_TOKEN: &str = "test-access-token";
pub const SESSION_COOKIE: &str = "_gumroad_app_session=abc123";
pub const PRODUCT_ID: &str = "BTMt";
pub const LICENSE_KEY: &str = "C1234A-4SSSS2E-B312342-D1324E1";
pub const SUBSCRIPTION_ID: &str = "sub-1";

/// Prices of the seven charges on the cancelled reference subscription.
pub const CANCELLED_PRICES: [u64; 7] = [2334, 2334, 2334, 2334, 2334, 2334, 2337];

pub fn credentials() -> Credentials {
    Credentials::new(ACCESS_TOKEN).with_session_cookie(SESSION_COOKIE)
}

/// Body of a successful `licenses/verify` call.
pub fn verify_body(subscription_id: Option<&str>) -> Value {
    json!({
        "success": true,
        "uses": 2,
        "purchase": {
            "id": "purchase-0",
            "seller_id": "seller",
            "product_id": "prod",
            "product_name": "open-wa License Keys",
            "permalink": "open-wa",
            "short_product_id": PRODUCT_ID,
            "email": "buyer@example.com",
            "price": 2334,
            "gumroad_fee": "263",
            "currency": "usd",
            "sale_timestamp": "2020-05-13T01:24:06Z",
            "subscription_id": subscription_id,
            "license_key": LICENSE_KEY,
            "recurrence": "monthly",
            "refunded": false,
            "disputed": false,
            "dispute_won": false,
            "created_at": "2020-05-13T01:24:06Z",
            "subscription_ended_at": null,
            "subscription_cancelled_at": null,
            "subscription_failed_at": null
        }
    })
}

/// A subscriber record with the given status.
pub fn subscriber(status: &str) -> Value {
    json!({
        "id": SUBSCRIPTION_ID,
        "product_id": "prod",
        "product_name": "open-wa License Keys",
        "user_id": "user-1",
        "user_email": "buyer@example.com",
        "purchase_ids": ["purchase-0"],
        "created_at": "2020-05-13T01:24:06Z",
        "recurrence": "monthly",
        "cancelled_at": null,
        "ended_at": null,
        "failed_at": null,
        "status": status
    })
}

/// Body of a successful `subscribers/{id}` call.
pub fn subscriber_body(status: &str) -> Value {
    json!({ "success": true, "subscriber": subscriber(status) })
}

/// Charge history where only the first charge carries the license key.
pub fn charges_body(prices: &[u64], remaining: u64) -> Value {
    let purchases: Vec<Value> = prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let license_key = (i == 0).then_some(LICENSE_KEY);
            json!({
                "id": format!("purchase-{i}"),
                "seller_id": "seller",
                "product_id": "prod",
                "subscription_id": SUBSCRIPTION_ID,
                "price": price,
                "gumroad_fee": 0,
                "recurring_charge": i > 0,
                "license_key": license_key,
            })
        })
        .collect();

    json!({
        "success": true,
        "remaining_charges_count": remaining,
        "fixed_length_subscription": remaining > 0,
        "recurring_purchases": purchases,
    })
}

/// In-memory [`HttpBackend`] that answers from a route table and records
/// every request it sees.
#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<Vec<(Method, String, HttpResponse)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answers requests whose URL ends with `suffix`. Replaces an existing
    /// route for the same method and suffix.
    pub fn route(&self, method: Method, suffix: &str, status: u16, body: Value) {
        let mut routes = self.routes.lock().unwrap();
        routes.retain(|(m, s, _)| !(*m == method && s == suffix));
        routes.push((method, suffix.to_string(), HttpResponse { status, body }));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests whose URL ends with `suffix`.
    pub fn calls_to(&self, suffix: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl HttpBackend for FakeBackend {
    async fn execute(&self, request: HttpRequest) -> LicenseResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let routes = self.routes.lock().unwrap();
        routes
            .iter()
            .find(|(m, s, _)| *m == request.method && request.url.ends_with(s.as_str()))
            .map(|(_, _, response)| response.clone())
            .ok_or_else(|| {
                LicenseError::UnexpectedResponse(format!(
                    "no route for {} {}",
                    request.method, request.url
                ))
            })
    }
}

/// A client over `backend` with a default product id.
pub fn fake_client(backend: Arc<FakeBackend>) -> GumroadClient {
    let config = ClientConfig {
        api_base_url: "https://api.test/v2".to_string(),
        app_base_url: "https://app.test".to_string(),
        ..Default::default()
    }
    .with_product_id(PRODUCT_ID);
    GumroadClient::with_backend(backend, credentials(), config)
}

/// A fake backend wired for the reference subscription.
pub fn subscription_backend(status: &str, prices: &[u64], remaining: u64) -> Arc<FakeBackend> {
    let backend = FakeBackend::new();
    backend.route(Method::Post, "licenses/verify", 200, verify_body(Some(SUBSCRIPTION_ID)));
    backend.route(
        Method::Get,
        &format!("subscribers/{SUBSCRIPTION_ID}"),
        200,
        subscriber_body(status),
    );
    backend.route(
        Method::Get,
        &format!("subscription_recurring_purchases/{SUBSCRIPTION_ID}"),
        200,
        charges_body(prices, remaining),
    );
    backend
}
