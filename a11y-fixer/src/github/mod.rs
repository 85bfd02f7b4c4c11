//! Throttled access to the GitHub REST and GraphQL APIs.
//!
//! Every request made by this crate goes through [`GitHubClient::post`], which
//! applies the [`RateLimitPolicy`] it was built with. The client is created
//! once per run and handed to the [`Runner`][`crate::runner::Runner`].

mod error;
mod transport;

pub use error::ApiError;
pub use transport::{OctocrabTransport, RawResponse, Transport, RATE_LIMIT_HEADERS};

use crate::rate_limit::{
    detect, unix_now, wait_for_retry_after, RateLimitInfo, RateLimitKind, RateLimitPolicy,
    RetryCounts, ThrottleDecision,
};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Builds the authenticated octocrab instance used for every request.
///
/// Octocrab's own retry middleware is disabled: it re-sends 429 and 5xx
/// responses without waiting, underneath [`GitHubClient::post`].
///
/// # Arguments
///
/// * `token` - GitHub token
/// * `base_uri` - API root, e.g. `https://api.github.com`; octocrab's default when `None`
///
/// # Errors
///
/// Returns [`octocrab::Error`] if `base_uri` is not a valid URI or the HTTP
/// client cannot be built.
pub fn build_octocrab(token: &str, base_uri: Option<&str>) -> octocrab::Result<Octocrab> {
    let mut builder = Octocrab::builder()
        .personal_token(token.to_string())
        .add_retry_config(RetryConfig::None);
    if let Some(base_uri) = base_uri {
        builder = builder.base_uri(base_uri)?;
    }
    builder.build()
}

/// GitHub API client with rate limit cooperation baked in.
#[derive(Clone)]
pub struct GitHubClient<T = OctocrabTransport> {
    transport: T,
    policy: RateLimitPolicy,
}

impl GitHubClient<OctocrabTransport> {
    /// Builds a client on top of an authenticated [`Octocrab`] instance.
    pub fn from_octocrab(octocrab: Octocrab, policy: RateLimitPolicy) -> Self {
        Self::new(OctocrabTransport::new(octocrab), policy)
    }
}

impl<T: Transport> GitHubClient<T> {
    /// Creates a client over an arbitrary transport.
    pub fn new(transport: T, policy: RateLimitPolicy) -> Self {
        Self { transport, policy }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the throttle policy.
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Posts a JSON payload and returns the successful response body.
    ///
    /// Rate limited responses are retried after the server-specified delay
    /// while the policy allows it.
    ///
    /// # Arguments
    ///
    /// * `request` - Human readable name of the request, used in logs and errors
    /// * `route` - API route, e.g. `/graphql`
    /// * `payload` - JSON request body
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RateLimited`] once the retry ceiling is reached,
    /// [`ApiError::Status`] for other non-success statuses, and transport errors as-is.
    pub async fn post(&self, request: &str, route: &str, payload: &Value) -> Result<String, ApiError> {
        let mut retries = RetryCounts::default();

        loop {
            let response = self.transport.post(route, payload).await?;

            let Some(signal) = detect(&response, unix_now(), self.policy.fallback_wait()) else {
                return finish(request, response);
            };

            match signal.kind {
                RateLimitKind::Primary => {
                    warn!(request, route, "Request quota exhausted for request")
                }
                RateLimitKind::Secondary => {
                    warn!(request, route, "Secondary rate limit hit for request")
                }
            }

            let attempted = retries.get(signal.kind);
            match self.policy.decide(&signal, attempted) {
                ThrottleDecision::Retry { after } => {
                    info!(
                        request,
                        kind = %signal.kind,
                        retry = attempted + 1,
                        after_secs = after.as_secs(),
                        "Retrying throttled request"
                    );
                    wait_for_retry_after(after, self.policy.max_wait()).await;
                    retries.record(signal.kind);
                }
                ThrottleDecision::GiveUp => {
                    return Err(ApiError::RateLimited {
                        request: request.to_string(),
                        kind: signal.kind,
                        retries: attempted,
                        message: response.error_message(),
                    });
                }
            }
        }
    }

    /// Posts a REST payload and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// See [`GitHubClient::post`]; additionally [`ApiError::Decode`] when the
    /// body does not match `R`.
    pub async fn rest<R: DeserializeOwned>(
        &self,
        request: &str,
        route: &str,
        payload: &Value,
    ) -> Result<R, ApiError> {
        let body = self.post(request, route, payload).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            request: request.to_string(),
            source,
        })
    }

    /// Runs a GraphQL query or mutation and returns its `data`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::GraphQl`] when the response carries errors or no data.
    pub async fn graphql<R: DeserializeOwned>(
        &self,
        request: &str,
        query: &str,
        variables: Value,
    ) -> Result<R, ApiError> {
        debug!(request, "Sending GraphQL request");
        let payload = json!({ "query": query, "variables": variables });
        let response: GraphQlResponse<R> = self.rest(request, "/graphql", &payload).await?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            return Err(ApiError::GraphQl {
                request: request.to_string(),
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        response.data.ok_or_else(|| ApiError::GraphQl {
            request: request.to_string(),
            messages: vec!["response contained no data".to_string()],
        })
    }
}

/// Maps a non-throttled response to its body or a status error.
fn finish(request: &str, response: RawResponse) -> Result<String, ApiError> {
    if let Some(info) = RateLimitInfo::from_response(&response) {
        if info.is_low() {
            warn!(
                request,
                remaining = info.remaining,
                reset = info.reset,
                "Rate limit nearly exhausted"
            );
        }
    }

    if !response.is_success() {
        return Err(ApiError::Status {
            request: request.to_string(),
            status: response.status,
            message: response.error_message(),
        });
    }

    Ok(response.body)
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<R> {
    data: Option<R>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}
