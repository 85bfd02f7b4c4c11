//! Throttle policy applied to every outbound request.

use super::{RateLimitKind, RateLimitSignal};
use std::time::Duration;

/// Automatic retries allowed per signal kind for a single request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Wait used when the server does not say how long to back off.
pub const DEFAULT_FALLBACK_WAIT: Duration = Duration::from_secs(60);

/// Maximum time to wait for a rate limit reset (1 hour).
pub const MAX_WAIT: Duration = Duration::from_secs(3600);

/// What to do with a throttled request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Wait, then send the same request again.
    Retry {
        /// Time to wait before retrying.
        after: Duration,
    },

    /// Stop retrying and surface the rate limit error.
    GiveUp,
}

/// Ceiling and waits for transport-level rate limit retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_retries: u32,
    fallback_wait: Duration,
    max_wait: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            fallback_wait: DEFAULT_FALLBACK_WAIT,
            max_wait: MAX_WAIT,
        }
    }
}

impl RateLimitPolicy {
    /// Creates a policy.
    #[must_use]
    pub fn new(max_retries: u32, fallback_wait: Duration, max_wait: Duration) -> Self {
        Self {
            max_retries,
            fallback_wait,
            max_wait,
        }
    }

    /// Returns the retry ceiling per signal kind.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns the wait used when the server gives no hint.
    pub fn fallback_wait(&self) -> Duration {
        self.fallback_wait
    }

    /// Returns the longest single wait.
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Decides whether a throttled request is retried.
    ///
    /// `retries_so_far` counts earlier automatic retries of the same request
    /// for the same [`RateLimitKind`].
    #[must_use]
    pub fn decide(&self, signal: &RateLimitSignal, retries_so_far: u32) -> ThrottleDecision {
        if retries_so_far < self.max_retries {
            ThrottleDecision::Retry {
                after: signal.retry_after,
            }
        } else {
            ThrottleDecision::GiveUp
        }
    }

    /// Upper bound on HTTP requests sent for one logical call.
    ///
    /// Primary and secondary signals are counted separately, so a single call
    /// may be retried up to `max_retries` times for each.
    #[must_use]
    pub fn worst_case_requests(&self) -> u32 {
        1 + self.max_retries.saturating_mul(2)
    }
}

/// Automatic retries already made for one request, per signal kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryCounts {
    primary: u32,
    secondary: u32,
}

impl RetryCounts {
    /// Returns the retries made for `kind`.
    pub fn get(&self, kind: RateLimitKind) -> u32 {
        match kind {
            RateLimitKind::Primary => self.primary,
            RateLimitKind::Secondary => self.secondary,
        }
    }

    /// Records one more retry for `kind`.
    pub fn record(&mut self, kind: RateLimitKind) {
        match kind {
            RateLimitKind::Primary => self.primary += 1,
            RateLimitKind::Secondary => self.secondary += 1,
        }
    }
}
