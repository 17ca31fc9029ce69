//! Authenticated and cookie-authenticated request paths.
//!
//! Gumroad exposes two disjoint endpoint families: the public JSON API,
//! authenticated with an access token, and the application host, which only
//! accepts a browser session cookie. Each family has its own method here so a
//! credential is never sent to the other.

use crate::config::{ClientConfig, Credentials};
use crate::error::{LicenseError, LicenseResult};
use crate::http::{HttpBackend, HttpRequest, HttpResponse, Method};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Issues requests against the API host and the application host.
pub struct Transport {
    backend: Arc<dyn HttpBackend>,
    credentials: Credentials,
    api_base_url: String,
    app_base_url: String,
}

impl Transport {
    /// Creates a transport over the given backend.
    pub fn new(
        backend: Arc<dyn HttpBackend>,
        credentials: Credentials,
        config: &ClientConfig,
    ) -> Self {
        Self {
            backend,
            credentials,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            app_base_url: config.app_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns true if cookie-authenticated calls can be made.
    #[must_use]
    pub fn has_session_cookie(&self) -> bool {
        self.credentials.has_session_cookie()
    }

    /// Sends a token-authenticated request and returns the raw response
    /// without judging it.
    pub async fn authenticated_raw(
        &self,
        method: Method,
        endpoint: &str,
        data: Value,
    ) -> LicenseResult<HttpResponse> {
        let mut query = vec![(
            "access_token".to_string(),
            self.credentials.access_token().to_string(),
        )];
        let body = split_payload(method, data, &mut query);

        let request = HttpRequest {
            method,
            url: join_url(&self.api_base_url, endpoint),
            query,
            headers: Vec::new(),
            body,
        };

        debug!(%method, endpoint, "api request");
        self.backend.execute(request).await
    }

    /// Sends a token-authenticated request.
    ///
    /// Succeeds only if the status is 200 and the body's `success` flag is
    /// true.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Api`] carrying the status and the flag
    /// otherwise.
    pub async fn authenticated(
        &self,
        method: Method,
        endpoint: &str,
        data: Value,
    ) -> LicenseResult<Value> {
        let response = self.authenticated_raw(method, endpoint, data).await?;
        let success = success_flag(&response.body);

        if response.status == 200 && success == Some(true) {
            return Ok(response.body);
        }

        warn!(status = response.status, ?success, endpoint, "api request failed");
        Err(LicenseError::Api {
            status: response.status,
            success,
        })
    }

    /// Sends a cookie-authenticated request to the application host.
    ///
    /// Success is status 200 alone; bodies may be bare arrays.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::Config`] if no session cookie was supplied,
    /// and [`LicenseError::Api`] on any other status.
    pub async fn with_cookie(
        &self,
        method: Method,
        endpoint: &str,
        data: Value,
    ) -> LicenseResult<Value> {
        let cookie = self.credentials.session_cookie().ok_or_else(|| {
            LicenseError::Config(format!("session cookie required for {endpoint}"))
        })?;

        let mut query = Vec::new();
        let body = split_payload(method, data, &mut query);

        let request = HttpRequest {
            method,
            url: join_url(&self.app_base_url, endpoint),
            query,
            headers: vec![("Cookie".to_string(), cookie.to_string())],
            body,
        };

        debug!(%method, endpoint, "app request");
        let response = self.backend.execute(request).await?;

        if response.status == 200 {
            return Ok(response.body);
        }

        let success = success_flag(&response.body);
        warn!(status = response.status, ?success, endpoint, "app request failed");
        Err(LicenseError::Api {
            status: response.status,
            success,
        })
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("credentials", &self.credentials)
            .field("api_base_url", &self.api_base_url)
            .field("app_base_url", &self.app_base_url)
            .finish_non_exhaustive()
    }
}

/// Reads the `success` flag of a response body.
pub(crate) fn success_flag(body: &Value) -> Option<bool> {
    body.get("success").and_then(Value::as_bool)
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!("{}/{}", base, endpoint.trim_start_matches('/'))
}

/// GET payloads go into the query string; everything else becomes the JSON
/// body. Null and empty-object payloads send no body.
fn split_payload(
    method: Method,
    data: Value,
    query: &mut Vec<(String, String)>,
) -> Option<Value> {
    match (method, data) {
        (_, Value::Null) => None,
        (Method::Get, Value::Object(fields)) => {
            for (key, value) in fields {
                let value = match value {
                    Value::Null => continue,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                query.push((key, value));
            }
            None
        }
        (_, Value::Object(fields)) if fields.is_empty() => None,
        (_, data) => Some(data),
    }
}
