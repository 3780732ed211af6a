//! Retry policy
//!
//! A [`RetryPolicy`] bundles the three decisions the channel makes after a
//! failed attempt: whether the failure qualifies (predicate), whether the
//! attempt budget allows another try (ceiling), and how long to wait
//! (backoff). The policy holds no counters; the channel passes the attempt
//! number of the call in progress.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::classify::ClassifiedError;
use crate::config::DEFAULT_MAX_ATTEMPTS;

/// Delay before re-attempting
pub trait Backoff: Send + Sync + fmt::Debug {
    /// Delay after the `attempt`-th failed attempt (1-based)
    fn delay(&self, attempt: u32) -> Duration;
}

/// Retry immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackoff;

impl Backoff for NoBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}

/// Same delay every time
#[derive(Debug, Clone, Copy)]
pub struct ConstantBackoff(pub Duration);

impl Backoff for ConstantBackoff {
    fn delay(&self, _attempt: u32) -> Duration {
        self.0
    }
}

/// `initial * 2^(attempt-1)`, capped at `max`
#[derive(Debug, Clone, Copy)]
pub struct ExponentialBackoff {
    pub initial: Duration,
    pub max: Duration,
}

impl ExponentialBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self { initial, max }
    }
}

impl Backoff for ExponentialBackoff {
    fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        self.initial
            .checked_mul(1u32 << shift)
            .unwrap_or(self.max)
            .min(self.max)
    }
}

/// Decides whether a classified failure may be re-attempted
pub type RetryPredicate = fn(&ClassifiedError) -> bool;

/// Retry whatever the classifier marked retryable
pub fn retry_retryable(error: &ClassifiedError) -> bool {
    error.retryable
}

/// Retry policy injected into the channel
#[derive(Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Arc<dyn Backoff>,
    predicate: RetryPredicate,
}

impl RetryPolicy {
    /// Up to `max_attempts` attempts per call (first try included), no delay
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(NoBackoff),
            predicate: retry_retryable,
        }
    }

    /// Single attempt, never retry
    pub fn never() -> Self {
        Self::new(1)
    }

    pub fn with_backoff(mut self, backoff: impl Backoff + 'static) -> Self {
        self.backoff = Arc::new(backoff);
        self
    }

    pub fn with_predicate(mut self, predicate: RetryPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether to try again after `attempts` attempts have failed, the last with `error`
    pub fn should_retry(&self, error: &ClassifiedError, attempts: u32) -> bool {
        attempts < self.max_attempts && (self.predicate)(error)
    }

    /// Delay before the attempt following attempt number `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::transport::TransportFailure;
    use http::StatusCode;

    fn server_error() -> ClassifiedError {
        classify(&TransportFailure::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: String::new(),
        })
    }

    fn unauthorized() -> ClassifiedError {
        classify(&TransportFailure::Status {
            status: StatusCode::UNAUTHORIZED,
            body: String::new(),
        })
    }

    #[test]
    fn test_ceiling() {
        let policy = RetryPolicy::default();
        let err = server_error();
        assert!(policy.should_retry(&err, 1));
        assert!(policy.should_retry(&err, 2));
        assert!(!policy.should_retry(&err, 3));
    }

    #[test]
    fn test_non_retryable_never_retried() {
        let policy = RetryPolicy::new(10);
        assert!(!policy.should_retry(&unauthorized(), 1));
    }

    #[test]
    fn test_never() {
        assert_eq!(RetryPolicy::never().max_attempts(), 1);
        assert!(!RetryPolicy::never().should_retry(&server_error(), 1));
        assert_eq!(RetryPolicy::new(0).max_attempts(), 1);
    }

    #[test]
    fn test_custom_predicate() {
        fn only_timeouts(e: &ClassifiedError) -> bool {
            e.kind == shared::ErrorKind::Timeout
        }
        let policy = RetryPolicy::new(3).with_predicate(only_timeouts);
        assert!(!policy.should_retry(&server_error(), 1));
        assert!(policy.should_retry(&classify(&TransportFailure::Timeout), 1));
    }

    #[test]
    fn test_default_has_no_delay() {
        assert_eq!(RetryPolicy::default().delay_for(1), Duration::ZERO);
    }

    #[test]
    fn test_exponential_backoff() {
        let backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(1));
        assert_eq!(backoff.delay(1), Duration::from_millis(100));
        assert_eq!(backoff.delay(2), Duration::from_millis(200));
        assert_eq!(backoff.delay(3), Duration::from_millis(400));
        assert_eq!(backoff.delay(5), Duration::from_secs(1));
        assert_eq!(backoff.delay(40), Duration::from_secs(1));
    }

    #[test]
    fn test_constant_backoff() {
        let policy = RetryPolicy::default().with_backoff(ConstantBackoff(Duration::from_millis(5)));
        assert_eq!(policy.delay_for(1), Duration::from_millis(5));
        assert_eq!(policy.delay_for(7), Duration::from_millis(5));
    }
}
