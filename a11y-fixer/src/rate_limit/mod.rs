//! Rate limit cooperation for GitHub API requests.
//!
//! This module recognises GitHub's primary (quota) and secondary
//! (abuse-detection) rate limit responses, respects the `Retry-After` and
//! `x-ratelimit-reset` headers, and decides whether a throttled request is
//! retried. The retry loop itself lives in [`crate::github::GitHubClient`].

mod info;
mod policy;

pub use info::RateLimitInfo;
pub use policy::{
    RateLimitPolicy, RetryCounts, ThrottleDecision, DEFAULT_FALLBACK_WAIT, DEFAULT_MAX_RETRIES,
    MAX_WAIT,
};

use crate::github::RawResponse;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Kind of rate limit GitHub applied to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitKind {
    /// The hourly request quota is exhausted.
    Primary,

    /// An abuse-detection throttle was triggered.
    Secondary,
}

impl fmt::Display for RateLimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

/// A rate limit detected on a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSignal {
    /// Which limit was hit.
    pub kind: RateLimitKind,

    /// Server-specified time to wait before retrying.
    pub retry_after: Duration,
}

/// Classifies a response as rate limited.
///
/// # Arguments
///
/// * `response` - The raw response
/// * `now` - Current Unix time in seconds
/// * `fallback_wait` - Wait used when no header says how long to back off
///
/// # Returns
///
/// `None` if the response is not a rate limit response.
pub fn detect(response: &RawResponse, now: u64, fallback_wait: Duration) -> Option<RateLimitSignal> {
    let retry_after = response
        .header("retry-after")
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs);
    let info = RateLimitInfo::from_response(response);
    let primary_wait = || {
        retry_after
            .or_else(|| info.as_ref().map(|i| i.reset_after(now)))
            .unwrap_or(fallback_wait)
    };

    match response.status {
        403 | 429 => {
            let body = response.body.to_lowercase();
            if body.contains("secondary rate") || body.contains("abuse") {
                Some(RateLimitSignal {
                    kind: RateLimitKind::Secondary,
                    retry_after: retry_after.unwrap_or(fallback_wait),
                })
            } else if response.status == 429 || info.as_ref().is_some_and(|i| i.remaining == 0) {
                Some(RateLimitSignal {
                    kind: RateLimitKind::Primary,
                    retry_after: primary_wait(),
                })
            } else {
                None
            }
        }
        200 if has_graphql_rate_limit_error(&response.body) => Some(RateLimitSignal {
            kind: RateLimitKind::Primary,
            retry_after: primary_wait(),
        }),
        _ => None,
    }
}

/// GraphQL reports an exhausted quota as `200 OK` with a `RATE_LIMITED` error.
fn has_graphql_rate_limit_error(body: &str) -> bool {
    if !body.contains("RATE_LIMITED") {
        return false;
    }

    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("errors").and_then(Value::as_array).cloned())
        .is_some_and(|errors| {
            errors
                .iter()
                .any(|e| e.get("type").and_then(Value::as_str) == Some("RATE_LIMITED"))
        })
}

/// Waits out a rate limit, never longer than `max_wait`.
///
/// # Arguments
///
/// * `retry_after` - Time requested by the server
/// * `max_wait` - Upper bound on the wait
pub async fn wait_for_retry_after(retry_after: Duration, max_wait: Duration) {
    if retry_after > max_wait {
        warn!(
            wait_secs = retry_after.as_secs(),
            max_wait = max_wait.as_secs(),
            "Rate limit reset too far in future, capping wait time"
        );
    }

    let actual_wait = retry_after.min(max_wait);
    info!(
        retry_after = retry_after.as_secs(),
        actual_wait = actual_wait.as_secs(),
        "Waiting for rate limit"
    );
    tokio::time::sleep(actual_wait).await;
}

/// Current Unix time in seconds.
pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
