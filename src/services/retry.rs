//! Retry policy shared by every upstream request.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use tracing::debug;

use crate::error::ProviderError;

const MAX_DELAY: Duration = Duration::from_secs(5);

/// Bounded exponential backoff with jitter. Only transient errors are retried.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: usize,
    min_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, min_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_delay,
            max_delay: MAX_DELAY.max(min_delay),
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts - 1)
            .with_jitter()
    }

    /// Run `operation`, retrying transient failures.
    pub async fn run<T, F, Fut>(&self, label: &str, operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        operation
            .retry(self.backoff())
            .when(ProviderError::is_transient)
            .notify(|err: &ProviderError, delay: Duration| {
                debug!(
                    request = label,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying {} after {:?}: {}",
                    label,
                    delay,
                    err
                );
            })
            .await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}
