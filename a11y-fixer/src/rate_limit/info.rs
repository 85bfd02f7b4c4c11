//! Rate limit information.

use crate::github::RawResponse;
use std::time::Duration;

/// Remaining requests below which a warning is logged.
const LOW_REMAINING_THRESHOLD: u32 = 5;

/// Rate limit information reported by the `x-ratelimit-*` response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Reads the quota headers of a response.
    ///
    /// Returns `None` unless both `x-ratelimit-remaining` and
    /// `x-ratelimit-reset` are present and numeric.
    pub fn from_response(response: &RawResponse) -> Option<Self> {
        let remaining = parse_header(response, "x-ratelimit-remaining")?;
        let reset = parse_header(response, "x-ratelimit-reset")?;
        let limit = parse_header(response, "x-ratelimit-limit").unwrap_or(0);

        Some(Self {
            remaining: u32::try_from(remaining).unwrap_or(u32::MAX),
            reset,
            limit: u32::try_from(limit).unwrap_or(u32::MAX),
        })
    }

    /// Returns the time left until the quota resets.
    #[must_use]
    pub fn reset_after(&self, now: u64) -> Duration {
        Duration::from_secs(self.reset.saturating_sub(now))
    }

    /// Returns true when the quota is nearly used up.
    #[must_use]
    pub fn is_low(&self) -> bool {
        self.remaining < LOW_REMAINING_THRESHOLD
    }
}

fn parse_header(response: &RawResponse, name: &str) -> Option<u64> {
    response.header(name)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_quota_headers() {
        let response = RawResponse::new(200, "{}")
            .with_header("x-ratelimit-remaining", "10")
            .with_header("x-ratelimit-reset", "1234567890")
            .with_header("x-ratelimit-limit", "30");

        let info = RateLimitInfo::from_response(&response).unwrap();

        assert_eq!(info.remaining, 10);
        assert_eq!(info.reset, 1234567890);
        assert_eq!(info.limit, 30);
        assert!(!info.is_low());
    }

    #[test]
    fn missing_headers_yield_none() {
        let response = RawResponse::new(200, "{}").with_header("x-ratelimit-remaining", "3");
        assert!(RateLimitInfo::from_response(&response).is_none());
    }

    #[test]
    fn reset_in_the_past_means_no_wait() {
        let info = RateLimitInfo {
            remaining: 0,
            reset: 100,
            limit: 5000,
        };

        assert_eq!(info.reset_after(50), Duration::from_secs(50));
        assert_eq!(info.reset_after(200), Duration::ZERO);
        assert!(info.is_low());
    }
}
