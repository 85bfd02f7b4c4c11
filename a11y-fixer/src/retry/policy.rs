//! Retry policy for business-level polling.

use std::time::Duration;

/// Default number of attempts made before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;

/// Default delay before the second attempt.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(10);

/// Default upper bound for a single delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Default growth factor applied to the delay after each attempt.
pub const DEFAULT_MULTIPLIER: u32 = 2;

/// Bounded retry schedule used by [`retry`][`super::retry`].
///
/// The delay before attempt `n + 1` is `initial_delay * multiplier^(n - 1)`,
/// capped at `max_delay`. A multiplier of `1` yields a constant delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: DEFAULT_INITIAL_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Creates an escalating policy.
    ///
    /// `max_attempts` and `multiplier` are clamped to at least `1`.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        max_delay: Duration,
        multiplier: u32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay: max_delay.max(initial_delay),
            multiplier: multiplier.max(1),
        }
    }

    /// Creates a policy that waits the same `delay` between every attempt.
    #[must_use]
    pub fn constant(max_attempts: u32, delay: Duration) -> Self {
        Self::new(max_attempts, delay, delay, 1)
    }

    /// Returns the maximum number of attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay to wait after the given (1-based) failed attempt.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.saturating_pow(exponent);
        self.initial_delay
            .saturating_mul(factor)
            .min(self.max_delay)
    }

    /// Returns the total time spent waiting if every attempt comes back empty.
    #[must_use]
    pub fn worst_case_wait(&self) -> Duration {
        (1..self.max_attempts)
            .map(|attempt| self.delay_after(attempt))
            .sum()
    }
}
