//! Bounded retry with a fixed backoff.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

/// Attempt budget and the pause between failed attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error + 'static> {
    #[error("gave up after {attempts} attempts: {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: E,
    },
}

impl<E: std::error::Error + 'static> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// Runs `op` until it succeeds or the policy's attempts are used up.
///
/// Sleeps `policy.delay` after every failed attempt except the last. A policy
/// with zero attempts still runs `op` once.
pub async fn retry<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, RetryError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{label} succeeded on attempt {attempt}/{max_attempts}");
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    source: e,
                });
            }
            Err(e) => {
                warn!(
                    "{label} failed (attempt {attempt}/{max_attempts}): {e}; retrying in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Error)]
    #[error("not ready")]
    struct NotReady;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_succeeds_on_last_attempt() {
        let calls = Cell::new(0u32);
        let result = retry(fast(10), "connect", || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move { if n < 10 { Err(NotReady) } else { Ok(n) } }
        })
        .await;

        assert_eq!(result.unwrap(), 10);
        assert_eq!(calls.get(), 10);
    }

    #[tokio::test]
    async fn test_exhausts_attempts() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = retry(fast(10), "connect", || {
            calls.set(calls.get() + 1);
            async { Err(NotReady) }
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts(), 10);
        assert_eq!(calls.get(), 10);
        assert!(err.to_string().contains("not ready"));
    }

    #[tokio::test]
    async fn test_first_success_does_not_retry() {
        let calls = Cell::new(0u32);
        let result = retry(fast(3), "connect", || {
            calls.set(calls.get() + 1);
            async { Ok::<_, NotReady>("up") }
        })
        .await;

        assert_eq!(result.unwrap(), "up");
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_runs_once() {
        let calls = Cell::new(0u32);
        let result: Result<(), _> = retry(fast(0), "connect", || {
            calls.set(calls.get() + 1);
            async { Err(NotReady) }
        })
        .await;

        assert_eq!(result.unwrap_err().attempts(), 1);
        assert_eq!(calls.get(), 1);
    }
}
