//! Retry with exponential backoff for HTTP requests
//!
//! Only connection failures and 5xx responses are retried. Anything else is
//! returned to the caller straight away, and so is the last error once the
//! attempts run out.

use crate::config::RetryConfig;
use crate::domain::{BridgeError, Dhis2Error, GoDataError, Result};
use std::future::Future;
use std::time::Duration;

/// Whether an error is worth another attempt
pub fn is_retryable(err: &BridgeError) -> bool {
    matches!(
        err,
        BridgeError::Dhis2(Dhis2Error::ConnectionFailed(_))
            | BridgeError::Dhis2(Dhis2Error::ServerError { .. })
            | BridgeError::GoData(GoDataError::ConnectionFailed(_))
            | BridgeError::GoData(GoDataError::ServerError { .. })
    )
}

/// Delay before the given retry attempt (1-based)
pub fn backoff_delay(config: &RetryConfig, attempt: usize) -> Duration {
    let factor = config.backoff_multiplier.powf(attempt.saturating_sub(1) as f64);
    let delay_ms = (config.initial_delay_ms as f64 * factor) as u64;
    Duration::from_millis(delay_ms.min(config.max_delay_ms))
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out
pub async fn retry_request<F, T, Fut>(config: &RetryConfig, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_retries.max(1);
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts || !is_retryable(&e) {
                    return Err(e);
                }

                let delay = backoff_delay(config, attempt);
                crate::log_retry_attempt!(attempt, max_attempts, e.to_string());
                tracing::debug!(delay_ms = delay.as_millis() as u64, "Backing off");

                tokio::time::sleep(delay).await;
            }
        }
    }
}
