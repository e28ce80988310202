// src/error_recovery.rs
//! Retry with linear backoff for API operations.

use crate::error::AppError;
use crate::types::ValidationError;
use std::time::Duration;

/// How many times a request is attempted and how long to wait in between.
///
/// The wait after the `n`th failed attempt is `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self, ValidationError> {
        if max_attempts == 0 {
            return Err(ValidationError::InvalidRetryPolicy {
                reason: "at least one attempt is required".to_string(),
            });
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    /// A policy that never retries.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay before the next attempt, after `attempts` have failed.
    pub fn delay_after(&self, attempts: u32) -> Duration {
        self.base_delay.saturating_mul(attempts)
    }
}

/// Retries an async operation with linearly increasing delays.
///
/// Only errors for which [`AppError::is_retryable`] holds are retried; any
/// other error is returned immediately. When every attempt fails, the error
/// from the last attempt is returned.
pub async fn retry_with_backoff<F, T, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut operation: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>,
{
    let mut attempts = 0u32;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempts += 1;

                if !e.is_retryable() {
                    log::error!("{} failed: {}", label, e);
                    return Err(e);
                }

                if attempts >= policy.max_attempts {
                    log::error!("{} failed after {} attempt(s): {}", label, attempts, e);
                    return Err(e);
                }

                let delay = policy.delay_after(attempts);
                log::warn!(
                    "{} attempt {} failed ({}), retrying after {:?}",
                    label,
                    attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
