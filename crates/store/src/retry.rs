//! Bounded retry with backoff for transient store failures
//!
//! Only `StoreUnavailable` is retried. Every other error, and the last
//! unavailable error once attempts run out, propagates to the caller.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use common::{Error, Result};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Delay before the second attempt, doubled for each attempt after that
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Run `op`, retrying transient store failures with exponential backoff
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 1;
        loop {
            match op().await {
                Err(Error::StoreUnavailable(msg)) if attempt < self.attempts => {
                    warn!(
                        "Store unavailable (attempt {}/{}), retrying in {:?}: {}",
                        attempt, self.attempts, delay, msg
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        let calls = Cell::new(0u32);

        let result = policy
            .run(|| {
                let n = calls.get() + 1;
                calls.set(n);
                async move {
                    if n < 3 {
                        Err(Error::StoreUnavailable("flaky".to_string()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 42);
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let policy = RetryPolicy::new(2, Duration::ZERO);
        let calls = Cell::new(0u32);

        let err = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(Error::StoreUnavailable("down".to_string())) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::StoreUnavailable(_)));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_other_errors() {
        let policy = RetryPolicy::new(5, Duration::ZERO);
        let calls = Cell::new(0u32);

        let err = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err::<(), _>(Error::NotFound("level-9".to_string())) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(calls.get(), 1);
    }
}
