//! Exponential backoff with jitter for transient provider failures.

use rand::Rng;
use std::time::Duration;

/// Backoff schedule applied to retryable errors.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base: Duration,
    /// Upper bound for any single delay
    pub cap: Duration,
    /// Growth factor per attempt
    pub exponent: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base: Duration::from_secs(1),
            cap: Duration::from_secs(60),
            exponent: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay.
    pub fn with_base(mut self, base: Duration) -> Self {
        self.base = base;
        self
    }

    /// Delay before retry `attempt` (0-based) without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = self.exponent.powi(attempt as i32);
        let secs = self.base.as_secs_f64() * factor;
        Duration::from_secs_f64(secs.min(self.cap.as_secs_f64()))
    }

    /// Delay before retry `attempt` with up to 25% random jitter, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.backoff(attempt);
        let jitter = rand::thread_rng().gen_range(0.0..=0.25);
        let jittered = backoff.as_secs_f64() * (1.0 + jitter);
        Duration::from_secs_f64(jittered.min(self.cap.as_secs_f64()))
    }

    /// Delay honouring a provider `Retry-After` hint, clamped to the cap.
    pub fn delay_with_hint(&self, attempt: u32, retry_after: Option<u64>) -> Duration {
        match retry_after {
            Some(secs) => Duration::from_secs(secs).min(self.cap),
            None => self.delay_for(attempt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_exponentially() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(10), Duration::from_secs(60));
        assert!(policy.delay_for(10) <= Duration::from_secs(60));
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let policy = RetryPolicy::default();
        for _ in 0..50 {
            let delay = policy.delay_for(1);
            assert!(delay >= Duration::from_secs(2));
            assert!(delay <= Duration::from_millis(2500));
        }
    }

    #[test]
    fn test_retry_after_hint_clamped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_with_hint(0, Some(5)), Duration::from_secs(5));
        assert_eq!(policy.delay_with_hint(0, Some(600)), Duration::from_secs(60));
    }
}
