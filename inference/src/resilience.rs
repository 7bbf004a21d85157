//! Bounded retry with exponential backoff and a per-attempt timeout.
//!
//! Every outbound model call goes through [`call_with_retry`]. Only
//! failures that [`UpstreamError::is_retryable`] reports as transient are
//! retried. Dropping the returned future cancels the in-flight attempt, so
//! an abandoned inbound request stops its outbound call too.

use config::ResilienceConfig;
use errors::UpstreamError;
use metrics::counter;
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Budget for one attempt.
    pub call_timeout: Duration,
}

impl RetryPolicy {
    /// Single attempt, no backoff.
    pub fn no_retry(call_timeout: Duration) -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
            call_timeout,
        }
    }

    fn delays(&self) -> impl Iterator<Item = Duration> {
        // ExponentialBackoff yields `factor * base^n`; base 2 doubles the
        // delay each attempt starting from `initial_delay`.
        let initial_ms = self.initial_delay.as_millis().max(1) as u64;
        ExponentialBackoff::from_millis(2)
            .factor(initial_ms.div_ceil(2))
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.max_retries as usize)
    }
}

impl From<&ResilienceConfig> for RetryPolicy {
    fn from(config: &ResilienceConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            call_timeout: Duration::from_millis(config.call_timeout_ms),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&ResilienceConfig::default())
    }
}

/// Runs `operation` under `policy`, labelling failures with `service`.
pub async fn call_with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    service: &str,
    operation: F,
) -> Result<T, UpstreamError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    let mut delays = policy.delays();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let result = match tokio::time::timeout(policy.call_timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout {
                service: service.to_string(),
                timeout_ms: policy.call_timeout.as_millis() as u64,
            }),
        };

        let error = match result {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if !error.is_retryable() {
            return Err(error);
        }

        let Some(delay) = delays.next() else {
            tracing::warn!(service, attempts = attempt, error = %error, "Retries exhausted");
            return Err(error);
        };

        counter!("mindnote_upstream_retries_total", "service" => service.to_string())
            .increment(1);
        tracing::warn!(
            service,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Retrying upstream call"
        );
        tokio::time::sleep(delay).await;
    }
}
