//! Raw request transport beneath the throttled client.

use super::ApiError;
use futures::future::{BoxFuture, FutureExt};
use octocrab::Octocrab;
use serde_json::Value;
use std::collections::HashMap;

/// Response headers inspected for rate limit signalling.
pub const RATE_LIMIT_HEADERS: [&str; 4] = [
    "retry-after",
    "x-ratelimit-limit",
    "x-ratelimit-remaining",
    "x-ratelimit-reset",
];

/// A GitHub response before status handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,

    /// Selected response headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,

    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a response without headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Adds a header to the response.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Returns a header value by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Extracts the `message` field GitHub puts in error bodies, falling back
    /// to the raw body.
    pub fn error_message(&self) -> String {
        serde_json::from_str::<Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| self.body.trim().to_string())
    }
}

/// Sends POST requests to the GitHub API.
///
/// Implementations must not interpret statuses; throttling and error mapping
/// happen in [`GitHubClient`][`super::GitHubClient`].
pub trait Transport: Send + Sync {
    /// Posts `payload` as JSON to `route` (e.g. `/graphql`).
    fn post<'a>(
        &'a self,
        route: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, Result<RawResponse, ApiError>>;
}

/// [`Transport`] backed by an authenticated [`Octocrab`] instance.
#[derive(Clone)]
pub struct OctocrabTransport {
    octocrab: Octocrab,
}

impl OctocrabTransport {
    /// Wraps an already configured client.
    pub fn new(octocrab: Octocrab) -> Self {
        Self { octocrab }
    }
}

impl Transport for OctocrabTransport {
    fn post<'a>(
        &'a self,
        route: &'a str,
        payload: &'a Value,
    ) -> BoxFuture<'a, Result<RawResponse, ApiError>> {
        async move {
            let response = self.octocrab._post(route, Some(payload)).await?;
            let status = response.status().as_u16();
            let headers = RATE_LIMIT_HEADERS
                .iter()
                .filter_map(|name| {
                    response
                        .headers()
                        .get(*name)
                        .and_then(|value| value.to_str().ok())
                        .map(|value| ((*name).to_string(), value.to_string()))
                })
                .collect();
            let body = self.octocrab.body_to_string(response).await?;

            Ok(RawResponse {
                status,
                headers,
                body,
            })
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_error_message() {
        let response = RawResponse::new(404, r#"{"message":"Not Found","documentation_url":"x"}"#);
        assert_eq!(response.error_message(), "Not Found");

        let plain = RawResponse::new(502, " bad gateway \n");
        assert_eq!(plain.error_message(), "bad gateway");
    }

    #[test]
    fn headers_are_case_insensitive() {
        let response = RawResponse::new(200, "{}").with_header("Retry-After", "5");

        assert_eq!(response.header("retry-after"), Some("5"));
        assert_eq!(response.header("RETRY-AFTER"), Some("5"));
        assert!(response.is_success());
    }
}
