//! Error translation and retry policy.
//!
//! Classification is driven by the failure's message so that errors from
//! any source (the upstream client, a scripted source in tests, plain
//! strings from the UI) are treated the same way.

use std::future::Future;
use std::time::Duration;

use crate::time::sleep;

pub const GENERIC_ERROR_MESSAGE: &str =
    "An unexpected error occurred. Please try again.";

/// Known message fragments and what the user should see instead. The first
/// matching entry wins.
const ERROR_MESSAGES: &[(&str, &str)] = &[
    (
        "Rate limit exceeded",
        "Too many requests. Please wait a moment and try again.",
    ),
    (
        "Network error",
        "Unable to connect. Please check your internet connection.",
    ),
    (
        "HTTP error! status: 401",
        "Invalid API key. Please check your configuration.",
    ),
    (
        "HTTP error! status: 403",
        "Access forbidden. Please check your API permissions.",
    ),
    (
        "HTTP error! status: 404",
        "Service not found. Please try again later.",
    ),
    (
        "HTTP error! status: 429",
        "Too many requests. Please wait and try again.",
    ),
    (
        "HTTP error! status: 500",
        "Server error. Please try again later.",
    ),
    (
        "HTTP error! status: 503",
        "Service unavailable. Please try again later.",
    ),
];

/// Lowercase fragments of transient failures.
const RETRYABLE_PATTERNS: &[&str] = &[
    "network error",
    "http error! status: 5",
    "timeout",
    "econnreset",
    "enotfound",
    "rate limit",
    "status: 429",
];

/// A failure as it reaches the translator.
#[derive(Debug, Clone, Copy)]
pub enum RawError<'a> {
    /// A bare message. Translated only on an exact table match.
    Text(&'a str),
    /// An error value. Translated on a substring match of its message.
    Error(&'a (dyn std::error::Error + 'a)),
    /// Anything without a usable message.
    Unknown,
}

impl<'a> RawError<'a> {
    pub fn from_error<E: std::error::Error + 'a>(error: &'a E) -> Self {
        RawError::Error(error)
    }

    fn message(&self) -> Option<String> {
        match self {
            RawError::Text(text) => Some(text.to_string()),
            RawError::Error(error) => Some(error.to_string()),
            RawError::Unknown => None,
        }
    }
}

impl<'a> From<&'a str> for RawError<'a> {
    fn from(text: &'a str) -> Self {
        RawError::Text(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transient; safe to attempt again automatically.
    Retryable,
    Terminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ErrorKind,
    pub user_message: String,
}

impl Classification {
    pub fn is_retryable(&self) -> bool {
        self.kind == ErrorKind::Retryable
    }
}

/// The message to show the user for a failure.
pub fn user_message(raw: &RawError<'_>) -> String {
    match raw {
        RawError::Text(text) => ERROR_MESSAGES
            .iter()
            .find(|(key, _)| key == text)
            .map(|(_, message)| message.to_string())
            .unwrap_or_else(|| text.to_string()),
        RawError::Error(error) => {
            let message = error.to_string();
            ERROR_MESSAGES
                .iter()
                .find(|(key, _)| message.contains(key))
                .map(|(_, friendly)| friendly.to_string())
                .unwrap_or(message)
        }
        RawError::Unknown => GENERIC_ERROR_MESSAGE.to_string(),
    }
}

/// Whether a failure is transient: transport problems, 5xx, timeouts and
/// rate limiting.
pub fn is_retryable(raw: &RawError<'_>) -> bool {
    raw.message()
        .map(|message| {
            let message = message.to_lowercase();
            RETRYABLE_PATTERNS
                .iter()
                .any(|pattern| message.contains(pattern))
        })
        .unwrap_or(false)
}

pub fn classify(raw: &RawError<'_>) -> Classification {
    Classification {
        kind: if is_retryable(raw) {
            ErrorKind::Retryable
        } else {
            ErrorKind::Terminal
        },
        user_message: user_message(raw),
    }
}

/// Log a failure with the operation it happened in and return the message
/// for the user.
pub fn handle_api_error(raw: &RawError<'_>, context: &str) -> String {
    match raw.message() {
        Some(message) => {
            tracing::error!(context, "API error in {context}: {message}")
        }
        None => tracing::error!(context, "API error in {context}"),
    }
    user_message(raw)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl BackoffPolicy {
    /// Wait before retry number `attempt + 1`: `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Run `op` until it succeeds, fails with a terminal error, or has been
/// attempted `max_retries + 1` times. The last failure is returned.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: BackoffPolicy,
    mut op: F,
) -> Result<T, E>
where
    E: std::error::Error,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        let error = match op().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !is_retryable(&RawError::from_error(&error)) {
            tracing::debug!("Not retrying terminal error: {error}");
            return Err(error);
        }
        if attempt >= policy.max_retries {
            tracing::warn!(
                attempts = attempt + 1,
                "Giving up after retryable errors: {error}"
            );
            return Err(error);
        }

        let delay = policy.delay_for(attempt);
        tracing::info!(
            attempt = attempt + 1,
            delay_ms = delay.as_millis() as u64,
            "Retrying after error: {error}"
        );
        sleep(delay).await;
        attempt += 1;
    }
}
