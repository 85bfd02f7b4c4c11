//! Bounded polling for outcomes that happen outside of our control.
//!
//! An operation polled through [`retry`] reports `Ok(None)` while the awaited
//! outcome has not happened yet. Errors are never retried here; transport level
//! throttling is handled separately by [`crate::rate_limit`].

mod policy;

pub use policy::{
    RetryPolicy, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY,
    DEFAULT_MULTIPLIER,
};

use std::future::Future;
use tracing::debug;

/// Polls `operation` until it yields a value or the policy runs out of attempts.
///
/// # Returns
///
/// * `Ok(Some(value))` as soon as an attempt produces a value.
/// * `Ok(None)` when every attempt reported "not ready". Exhaustion is a
///   normal outcome, not an error.
///
/// # Errors
///
/// The first error returned by `operation` is propagated immediately, without
/// further attempts.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<Option<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let max_attempts = policy.max_attempts();

    for attempt in 1..=max_attempts {
        if let Some(value) = operation().await? {
            debug!(attempt, "Operation produced a result");
            return Ok(Some(value));
        }

        if attempt < max_attempts {
            let delay = policy.delay_after(attempt);
            debug!(
                attempt,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Result not ready, waiting before next attempt"
            );
            tokio::time::sleep(delay).await;
        }
    }

    debug!(max_attempts, "Attempts exhausted without a result");
    Ok(None)
}
