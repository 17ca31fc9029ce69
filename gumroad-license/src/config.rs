//! Client configuration and credentials.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default base URL of the token-authenticated API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.gumroad.com/v2";

/// Default base URL of the cookie-authenticated application host.
pub const DEFAULT_APP_BASE_URL: &str = "https://app.gumroad.com";

/// Settings for a [`GumroadClient`](crate::GumroadClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for token-authenticated calls.
    pub api_base_url: String,
    /// Base URL for cookie-authenticated calls.
    pub app_base_url: String,
    /// Product used when a call does not name one.
    pub product_id: Option<String>,
    /// Per-request timeout applied by the HTTP backend.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            product_id: None,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Sets the default product id. Empty strings clear it.
    #[must_use]
    pub fn with_product_id(mut self, product_id: impl Into<String>) -> Self {
        let product_id = product_id.into();
        self.product_id = (!product_id.is_empty()).then_some(product_id);
        self
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Secrets used to authenticate against Gumroad.
///
/// Not `Serialize`. `Debug` redacts both values.
#[derive(Clone)]
pub struct Credentials {
    access_token: String,
    session_cookie: Option<String>,
}

impl Credentials {
    /// Creates credentials for token-authenticated calls only.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            session_cookie: None,
        }
    }

    /// Adds a browser session cookie for cookie-authenticated calls.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        let cookie = cookie.into();
        self.session_cookie = (!cookie.is_empty()).then_some(cookie);
        self
    }

    /// Returns true if a session cookie is available.
    #[must_use]
    pub fn has_session_cookie(&self) -> bool {
        self.session_cookie.is_some()
    }

    pub(crate) fn access_token(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
