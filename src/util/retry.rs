//! Opt-in retry with exponential backoff and jitter.
//!
//! The default policy makes a single attempt. Callers that want retries
//! must raise `max_attempts` explicitly.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }

    /// Exponential backoff with the given attempt budget.
    pub fn with_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::none()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or the attempt budget is spent. The last error is returned.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if self.max_attempts == 0 {
            return Err(ClientError::InvalidArgument(
                "retry policy allows zero attempts".to_string(),
            ));
        }

        let mut attempt = 1;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if attempt >= self.max_attempts || !err.is_retryable() {
                return Err(err);
            }

            let delay = self.delay_for(attempt);
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Wait before the retry that follows failed attempt `attempt` (1-based).
    ///
    /// Grows by `multiplier` per attempt, is capped at `max_backoff`, then
    /// jittered to 75%..125%.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(64) as i32;
        let base = (self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent))
            .min(self.max_backoff.as_secs_f64())
            .max(0.0);
        Duration::from_secs_f64(base * (0.75 + rand_factor() * 0.5))
    }
}

/// Pseudo-random factor in [0, 1) derived from the clock and thread id.
fn rand_factor() -> f64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
        .hash(&mut hasher);
    std::thread::current().id().hash(&mut hasher);

    let hash = hasher.finish();
    (hash % 10000) as f64 / 10000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_makes_a_single_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.is_enabled());
    }

    #[test]
    fn with_attempts_keeps_backoff_defaults() {
        let policy = RetryPolicy::with_attempts(4);
        assert_eq!(policy.max_attempts, 4);
        assert!(policy.is_enabled());
        assert_eq!(policy.initial_backoff, Duration::from_millis(500));
    }

    #[test]
    fn delay_grows_then_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(300),
            multiplier: 2.0,
        };
        let within = |d: Duration, base_ms: f64| {
            let ms = d.as_secs_f64() * 1000.0;
            ms >= base_ms * 0.75 - 0.001 && ms <= base_ms * 1.25 + 0.001
        };
        assert!(within(policy.delay_for(1), 100.0));
        assert!(within(policy.delay_for(2), 200.0));
        assert!(within(policy.delay_for(3), 300.0));
        assert!(within(policy.delay_for(40), 300.0));
    }

    #[test]
    fn rand_factor_is_in_unit_range() {
        for _ in 0..32 {
            let f = rand_factor();
            assert!((0.0..1.0).contains(&f));
        }
    }
}
