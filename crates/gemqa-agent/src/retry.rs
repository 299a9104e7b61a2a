//! Retry policy for retryable request failures
//!
//! The default policy makes exactly one attempt. Extra attempts are opt-in
//! and back off exponentially, honoring `Retry-After` when the server sends
//! one.

use std::time::Duration;

const INITIAL_BACKOFF_SECS: u64 = 1;
const MAX_BACKOFF_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts allowed after the first one
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    /// One attempt, no retries
    pub fn single_attempt() -> Self {
        Self::with_max_retries(0)
    }

    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_secs(INITIAL_BACKOFF_SECS),
            max_backoff: Duration::from_secs(MAX_BACKOFF_SECS),
        }
    }

    /// Exponential delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Delay before retry number `retry`, preferring the server's hint
    pub fn delay(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        retry_after
            .map(|d| d.min(self.max_backoff))
            .unwrap_or_else(|| self.backoff(retry))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::single_attempt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_attempt() {
        assert_eq!(RetryPolicy::default().max_retries, 0);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::with_max_retries(10);
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
        assert_eq!(policy.backoff(6), Duration::from_secs(30));
        assert_eq!(policy.backoff(40), Duration::from_secs(30));
    }

    #[test]
    fn test_retry_after_preferred_but_capped() {
        let policy = RetryPolicy::with_max_retries(3);
        assert_eq!(
            policy.delay(1, Some(Duration::from_secs(7))),
            Duration::from_secs(7)
        );
        assert_eq!(
            policy.delay(1, Some(Duration::from_secs(600))),
            Duration::from_secs(30)
        );
        assert_eq!(policy.delay(2, None), Duration::from_secs(2));
    }
}
