mod common;

use common::{credentials, ACCESS_TOKEN, SESSION_COOKIE};
use gumroad_license::http::{Method, ReqwestBackend};
use gumroad_license::{ClientConfig, Credentials, LicenseError, Transport};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport_for(server: &MockServer, credentials: Credentials) -> Transport {
    let config = ClientConfig {
        api_base_url: format!("{}/v2/", server.uri()),
        app_base_url: server.uri(),
        ..Default::default()
    };
    let backend = ReqwestBackend::new(Duration::from_secs(5)).unwrap();
    Transport::new(Arc::new(backend), credentials, &config)
}

// ── Token-authenticated ─────────────────────────────────────────

#[tokio::test]
async fn get_merges_payload_into_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/products/BTMt/subscribers"))
        .and(query_param("access_token", ACCESS_TOKEN))
        .and(query_param("email", "buyer@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "subscribers": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    let body = transport
        .authenticated(
            Method::Get,
            "products/BTMt/subscribers",
            json!({ "email": "buyer@example.com" }),
        )
        .await
        .unwrap();
    assert_eq!(body["subscribers"], json!([]));
}

#[tokio::test]
async fn get_skips_null_payload_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/resource_subscriptions"))
        .and(query_param_is_missing("resource_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "resource_subscriptions": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    transport
        .authenticated(
            Method::Get,
            "resource_subscriptions",
            json!({ "resource_name": null }),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn post_sends_payload_as_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/licenses/verify"))
        .and(query_param("access_token", ACCESS_TOKEN))
        .and(body_json(json!({ "product_permalink": "BTMt", "license_key": "KEY" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    transport
        .authenticated(
            Method::Post,
            "licenses/verify",
            json!({ "product_permalink": "BTMt", "license_key": "KEY" }),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn success_false_with_200_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    let err = transport
        .authenticated(Method::Get, "user", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LicenseError::Api {
            status: 200,
            success: Some(false)
        }
    ));
    let msg = err.to_string();
    assert!(msg.contains("200"));
    assert!(msg.contains("success=false"));
}

#[tokio::test]
async fn non_200_is_api_error_even_with_success_true() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    let err = transport
        .authenticated(Method::Get, "user", json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(201));
}

#[tokio::test]
async fn non_json_body_reports_missing_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    let err = transport
        .authenticated(Method::Get, "user", json!({}))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        LicenseError::Api {
            status: 502,
            success: None
        }
    ));
    assert!(err.to_string().contains("success=undefined"));
}

// ── Cookie-authenticated ────────────────────────────────────────

#[tokio::test]
async fn cookie_request_sends_cookie_not_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers/search"))
        .and(header("Cookie", SESSION_COOKIE))
        .and(query_param("query", "buyer@example.com"))
        .and(query_param_is_missing("access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "p1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    let body = transport
        .with_cookie(
            Method::Get,
            "customers/search",
            json!({ "query": "buyer@example.com" }),
        )
        .await
        .unwrap();
    assert!(body.is_array());
}

#[tokio::test]
async fn cookie_request_needs_no_success_flag() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers/subscription_recurring_purchases/sub-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recurring_purchases": []
        })))
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    let body = transport
        .with_cookie(
            Method::Get,
            "customers/subscription_recurring_purchases/sub-1",
            serde_json::Value::Null,
        )
        .await
        .unwrap();
    assert_eq!(body["recurring_purchases"], json!([]));
}

#[tokio::test]
async fn cookie_request_non_200_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let transport = transport_for(&server, credentials());
    let err = transport
        .with_cookie(Method::Get, "customers/search", json!({ "query": "x" }))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LicenseError::Api {
            status: 401,
            success: Some(false)
        }
    ));
}

#[tokio::test]
async fn cookie_request_without_cookie_never_hits_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let transport = transport_for(&server, Credentials::new(ACCESS_TOKEN));
    assert!(!transport.has_session_cookie());

    let err = transport
        .with_cookie(Method::Get, "customers/search", json!({ "query": "x" }))
        .await
        .unwrap_err();
    assert!(err.is_config());
}

// ── Credentials ─────────────────────────────────────────────────

#[test]
fn debug_output_redacts_secrets() {
    let debug = format!("{:?}", credentials());
    assert!(!debug.contains(ACCESS_TOKEN));
    assert!(!debug.contains("abc123"));
    assert!(debug.contains("redacted"));
}

#[test]
fn empty_cookie_counts_as_absent() {
    let creds = Credentials::new(ACCESS_TOKEN).with_session_cookie("");
    assert!(!creds.has_session_cookie());
}
