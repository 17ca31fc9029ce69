use gumroad_license::types::SubscriptionStatus;
use gumroad_license::LicenseError;
use serde_json::json;

#[test]
fn error_display_config() {
    let err = LicenseError::Config("no product id provided".into());
    let msg = format!("{err}");
    assert!(msg.contains("invalid configuration"));
    assert!(msg.contains("no product id"));
    assert!(err.is_config());
}

#[test]
fn error_display_api_with_flag() {
    let err = LicenseError::Api {
        status: 200,
        success: Some(false),
    };
    assert_eq!(format!("{err}"), "gumroad api returned 200, success=false");
    assert_eq!(err.status(), Some(200));
}

#[test]
fn error_display_api_without_flag() {
    let err = LicenseError::Api {
        status: 503,
        success: None,
    };
    assert_eq!(format!("{err}"), "gumroad api returned 503, success=undefined");
}

#[test]
fn error_display_invalid_subscription() {
    for status in SubscriptionStatus::ALL {
        let err = LicenseError::InvalidSubscription(status);
        assert!(format!("{err}").ends_with(status.as_str()));
        assert_eq!(err.invalid_status(), Some(status));
    }
}

#[test]
fn error_display_request_keeps_response() {
    let response = json!({ "success": false, "message": "not found" });
    let err = LicenseError::Request {
        message: "not found".into(),
        response: response.clone(),
    };
    assert!(format!("{err}").contains("request failed: not found"));
    match err {
        LicenseError::Request { response: r, .. } => assert_eq!(r, response),
        _ => unreachable!(),
    }
}

#[test]
fn error_display_no_subscription() {
    let err = LicenseError::NoSubscription;
    assert!(format!("{err}").contains("not tied to a subscription"));
    assert!(err.invalid_status().is_none());
}

#[test]
fn error_from_serde_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{bad").unwrap_err();
    let err = LicenseError::from(json_err);
    assert!(format!("{err}").contains("serialization error"));
}

#[test]
fn error_from_types() {
    let err = LicenseError::from("paused".parse::<SubscriptionStatus>().unwrap_err());
    assert!(format!("{err}").contains("unknown subscription status: paused"));
}

#[test]
fn local_errors_have_no_status() {
    assert!(LicenseError::Config("x".into()).status().is_none());
    assert!(LicenseError::NoSubscription.status().is_none());
}
