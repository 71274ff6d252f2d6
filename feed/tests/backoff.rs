use std::cell::Cell;
use std::time::Duration;

use feed::{BackoffPolicy, RawError, is_retryable, retry_with_backoff};
use payloads::ClientError;
use reqwest::StatusCode;
use tokio::time::Instant;

#[derive(Debug)]
struct Rejected(String);

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Rejected {}

fn policy(max_retries: u32) -> BackoffPolicy {
    BackoffPolicy {
        max_retries,
        base_delay: Duration::from_millis(1000),
    }
}

#[tokio::test(start_paused = true)]
async fn network_errors_are_retried_until_exhausted() {
    let calls = Cell::new(0);
    let error = Rejected("Network error. Please check your connection.".into());
    assert!(is_retryable(&RawError::from_error(&error)));

    let started = Instant::now();
    let result: Result<(), Rejected> = retry_with_backoff(policy(2), || {
        calls.set(calls.get() + 1);
        async { Err(Rejected("Network error. Please check your connection.".into())) }
    })
    .await;

    assert_eq!(calls.get(), 3);
    assert!(result.unwrap_err().0.contains("Network error"));
    // 1s after the first failure, 2s after the second.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(3), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn client_errors_are_not_retried() {
    let calls = Cell::new(0);
    let error = ClientError::Http(StatusCode::BAD_REQUEST);
    assert!(!is_retryable(&RawError::from_error(&error)));

    let started = Instant::now();
    let result: Result<(), ClientError> = retry_with_backoff(policy(3), || {
        calls.set(calls.get() + 1);
        async { Err(ClientError::Http(StatusCode::BAD_REQUEST)) }
    })
    .await;

    assert_eq!(calls.get(), 1);
    assert_eq!(
        result.unwrap_err().to_string(),
        "HTTP error! status: 400"
    );
    assert!(started.elapsed() < Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn recovers_after_a_transient_failure() -> anyhow::Result<()> {
    let calls = Cell::new(0);

    let value = retry_with_backoff(BackoffPolicy::default(), || {
        calls.set(calls.get() + 1);
        let attempt = calls.get();
        async move {
            if attempt < 3 {
                Err(ClientError::Http(StatusCode::SERVICE_UNAVAILABLE))
            } else {
                Ok(attempt)
            }
        }
    })
    .await?;

    assert_eq!(value, 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rate_limiting_is_retried() {
    let calls = Cell::new(0);

    let result: Result<(), ClientError> = retry_with_backoff(policy(1), || {
        calls.set(calls.get() + 1);
        async { Err(ClientError::RateLimited) }
    })
    .await;

    assert!(matches!(result, Err(ClientError::RateLimited)));
    assert_eq!(calls.get(), 2);
}
