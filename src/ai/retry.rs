use super::model::AiError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts made after the first one.
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub backoff_multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(2000),
            backoff_multiplier: 2,
        }
    }
}

/// Runs `call` and retries it with exponential backoff while it fails with a
/// rate-limit error. Any other error, or the last rate-limit error once the
/// retries are spent, is returned as is.
pub async fn with_rate_limit_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation: &str,
    mut call: F,
) -> Result<T, AiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AiError>>,
{
    let mut retries_left = policy.max_retries;
    let mut backoff = policy.initial_backoff;

    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_rate_limit() && retries_left > 0 => {
                warn!(
                    operation,
                    "rate limit hit, retrying in {}ms ({retries_left} attempts left)",
                    backoff.as_millis()
                );
                sleep(backoff).await;
                retries_left -= 1;
                backoff *= policy.backoff_multiplier;
            }
            Err(err) => {
                debug!(operation, "giving up: {err}");
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    fn rate_limited() -> AiError {
        AiError::Api {
            status: 429,
            message: "Resource exhausted".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn backs_off_two_then_four_seconds() {
        let started = Instant::now();
        let attempts = Mutex::new(Vec::new());

        let result = with_rate_limit_retry(&RetryPolicy::default(), "test", || {
            let mut seen = attempts.lock().unwrap();
            seen.push(started.elapsed());
            let attempt = seen.len();
            async move {
                if attempt < 3 {
                    Err(rate_limited())
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        let seen = attempts.lock().unwrap();
        assert_eq!(seen.len(), 3);
        let first_gap = seen[1] - seen[0];
        let second_gap = seen[2] - seen[1];
        assert!(first_gap >= Duration::from_millis(2000));
        assert!(first_gap < Duration::from_millis(2050));
        assert!(second_gap >= Duration::from_millis(4000));
        assert!(second_gap < Duration::from_millis(4050));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_return_rate_limit() {
        let calls = Mutex::new(0u32);
        let result: Result<(), AiError> =
            with_rate_limit_retry(&RetryPolicy::default(), "test", || {
                *calls.lock().unwrap() += 1;
                async { Err(rate_limited()) }
            })
            .await;

        assert!(result.unwrap_err().is_rate_limit());
        assert_eq!(*calls.lock().unwrap(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn other_errors_are_not_retried() {
        let calls = Mutex::new(0u32);
        let started = Instant::now();
        let result: Result<(), AiError> =
            with_rate_limit_retry(&RetryPolicy::default(), "test", || {
                *calls.lock().unwrap() += 1;
                async { Err(AiError::Transport("connection reset".to_string())) }
            })
            .await;

        assert!(matches!(result, Err(AiError::Transport(_))));
        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(started.elapsed() < Duration::from_millis(10));
    }
}
