use crate::core::error::FetchError;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Suspends the calling request chain between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Exponential backoff without jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub retries: usize,
    pub base_delay: Duration,
    pub retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            retries: 3,
            base_delay: Duration::from_secs(1),
            retry_client_errors: true,
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt `attempt` (0-indexed): `base * 2^attempt`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let factor = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    fn should_retry(&self, err: &FetchError) -> bool {
        match err {
            FetchError::Decode { .. } | FetchError::InvalidUrl { .. } => false,
            err if err.is_client_error() => self.retry_client_errors,
            _ => true,
        }
    }
}

/// Retries an async operation with exponential backoff
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `policy`: Number of retries and backoff base
/// - `sleeper`: Waits out the delay between attempts
/// - `endpoint`: Reported in the final error
///
/// # Returns
/// Either the successful result or `RetryExhausted` wrapping the last failure
pub async fn with_retry<F, Fut, T>(
    mut operation: F,
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    endpoint: &str,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if !policy.should_retry(&err) {
                    return Err(err);
                }
                if attempt >= policy.retries {
                    return Err(FetchError::RetryExhausted {
                        endpoint: endpoint.to_string(),
                        attempts: attempt + 1,
                        last: Box::new(err),
                    });
                }
                let delay = policy.delay_for(attempt);
                debug!(
                    "Attempt {}/{} for {} failed: {}. Retrying in {:?}...",
                    attempt + 1,
                    policy.retries + 1,
                    endpoint,
                    err,
                    delay
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records requested delays and returns immediately.
    #[derive(Clone, Default)]
    pub struct RecordingSleeper {
        delays: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingSleeper {
        pub fn delays(&self) -> Vec<Duration> {
            self.delays.lock().unwrap().clone()
        }

        pub fn total(&self) -> Duration {
            self.delays().iter().sum()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSleeper;
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn server_error() -> FetchError {
        FetchError::Http {
            endpoint: "/api/analytics".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    async fn run_with_failures(failures: usize) -> (Result<u32, FetchError>, usize, Duration) {
        let calls = AtomicUsize::new(0);
        let sleeper = RecordingSleeper::default();
        let result = with_retry(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < failures {
                        Err(server_error())
                    } else {
                        Ok(42)
                    }
                }
            },
            &RetryPolicy::default(),
            &sleeper,
            "/api/analytics",
        )
        .await;
        (result, calls.load(Ordering::SeqCst), sleeper.total())
    }

    #[tokio::test]
    async fn test_backoff_totals_for_transient_failures() {
        for (failures, expected_secs) in [(0, 0), (1, 1), (2, 3), (3, 7)] {
            let (result, calls, waited) = run_with_failures(failures).await;
            assert_eq!(result.unwrap(), 42);
            assert_eq!(calls, failures + 1);
            assert_eq!(waited, Duration::from_secs(expected_secs));
        }
    }

    #[tokio::test]
    async fn test_exhaustion_stops_after_four_attempts() {
        let (result, calls, waited) = run_with_failures(10).await;
        assert_eq!(calls, 4);
        assert_eq!(waited, Duration::from_secs(7));
        match result.unwrap_err() {
            FetchError::RetryExhausted {
                endpoint,
                attempts,
                last,
            } => {
                assert_eq!(endpoint, "/api/analytics");
                assert_eq!(attempts, 4);
                assert!(matches!(*last, FetchError::Http { .. }));
            }
            other => panic!("Expected RetryExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_errors_fail_fast_when_disabled() {
        let calls = AtomicUsize::new(0);
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy {
            retry_client_errors: false,
            ..RetryPolicy::default()
        };
        let result: Result<(), _> = with_retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(FetchError::Http {
                        endpoint: "/api/budgets".to_string(),
                        status: StatusCode::UNPROCESSABLE_ENTITY,
                    })
                }
            },
            &policy,
            &sleeper,
            "/api/budgets",
        )
        .await;

        assert!(matches!(result, Err(FetchError::Http { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn test_delay_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }
}
