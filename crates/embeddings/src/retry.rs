//! Bounded exponential-backoff retry around a single provider call.

use std::{future::Future, time::Duration};

use {async_trait::async_trait, rand::Rng, tracing::warn};

use crate::error::EmbeddingError;

/// Backoff schedule: `base_delay * 2^attempt` plus uniform jitter in
/// `[0, base_delay)` so simultaneous failed batches don't retry in lockstep.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt, so at most `max_retries + 1` calls.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay before the retry following failed attempt number `attempt`
    /// (zero-based).
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let backoff = self.base_delay * 2u32.saturating_pow(attempt);
        let jitter = self.base_delay.mul_f64(rand::rng().random::<f64>());
        backoff + jitter
    }
}

/// Wall-clock wait, injectable so retry tests run without real elapsed time.
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

/// Run `op`, retrying transient failures per `policy`.
///
/// Non-retryable errors and retry-budget exhaustion propagate the original
/// error unchanged. `label` identifies the call in retry logs.
pub async fn call_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    sleeper: &dyn Sleeper,
    label: &str,
    mut op: F,
) -> Result<T, EmbeddingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EmbeddingError>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                warn!(
                    label,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "embedding call failed, retrying"
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    };

    use reqwest::StatusCode;

    use super::*;

    /// Records requested delays instead of waiting them out.
    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn new() -> Self {
            Self {
                delays: Mutex::new(Vec::new()),
            }
        }

        fn count(&self) -> usize {
            self.delays.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    fn http(status: u16) -> EmbeddingError {
        EmbeddingError::Http {
            provider: "elastic",
            status: StatusCode::from_u16(status).unwrap(),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_success_on_third_attempt_after_two_sleeps() {
        let sleeper = RecordingSleeper::new();
        let attempts = AtomicU32::new(0);

        let result = call_with_retry(&RetryPolicy::default(), &sleeper, "test", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(http(429))
                } else {
                    Ok(vec![vec![1.0_f32]])
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), vec![vec![1.0]]);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.count(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_budget_makes_max_retries_plus_one_attempts() {
        let sleeper = RecordingSleeper::new();
        let attempts = AtomicU32::new(0);

        let result: Result<Vec<Vec<f32>>, _> =
            call_with_retry(&RetryPolicy::default(), &sleeper, "test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(http(429)) }
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            EmbeddingError::Http { status, .. } if status == StatusCode::TOO_MANY_REQUESTS
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        assert_eq!(sleeper.count(), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_error_short_circuits_with_zero_sleeps() {
        let sleeper = RecordingSleeper::new();
        let attempts = AtomicU32::new(0);

        let result: Result<Vec<Vec<f32>>, _> =
            call_with_retry(&RetryPolicy::default(), &sleeper, "test", || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err(http(401)) }
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            EmbeddingError::Http { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(sleeper.count(), 0);
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let sleeper = RecordingSleeper::new();
        let attempts = AtomicU32::new(0);

        let result = call_with_retry(&RetryPolicy::default(), &sleeper, "test", || {
            let n = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(http(503))
                } else {
                    Ok(vec![vec![0.5_f32]])
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(sleeper.count(), 1);
    }

    #[test]
    fn test_delay_doubles_per_attempt_with_bounded_jitter() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        };
        for attempt in 0..3 {
            let floor = Duration::from_millis(500 * 2_u64.pow(attempt));
            let ceiling = floor + Duration::from_millis(500);
            for _ in 0..50 {
                let delay = policy.delay_for(attempt);
                assert!(delay >= floor, "attempt {attempt}: {delay:?} < {floor:?}");
                assert!(delay < ceiling, "attempt {attempt}: {delay:?} >= {ceiling:?}");
            }
        }
    }
}
