//! Error types for license and subscription operations.

use gumroad_types::SubscriptionStatus;
use serde_json::Value;
use thiserror::Error;

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Errors that can occur while talking to Gumroad or resolving a license.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// A required setting (product id, session cookie) is missing.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The API answered with a non-200 status or a falsy `success` flag.
    #[error("gumroad api returned {status}, success={}", fmt_success(.success))]
    Api {
        status: u16,
        /// The payload's `success` flag, absent if the body had none.
        success: Option<bool>,
    },

    /// The subscription resolved but is not alive.
    #[error("invalid subscription: {0}")]
    InvalidSubscription(SubscriptionStatus),

    /// The license was issued by a one-off purchase with no subscription.
    #[error("license is not tied to a subscription")]
    NoSubscription,

    /// A lookup returned an unsuccessful payload.
    #[error("request failed: {message}")]
    Request {
        message: String,
        /// The raw response body.
        response: Value,
    },

    /// A response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Types(#[from] gumroad_types::Error),
}

fn fmt_success(success: &Option<bool>) -> String {
    match success {
        Some(flag) => flag.to_string(),
        None => "undefined".to_string(),
    }
}

impl LicenseError {
    /// Returns true if this error was raised locally before any request.
    pub fn is_config(&self) -> bool {
        matches!(self, LicenseError::Config(_))
    }

    /// Returns the observed status if this is an invalidity error.
    pub fn invalid_status(&self) -> Option<SubscriptionStatus> {
        match self {
            LicenseError::InvalidSubscription(status) => Some(*status),
            _ => None,
        }
    }

    /// Returns the HTTP status if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            LicenseError::Api { status, .. } => Some(*status),
            LicenseError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
