use std::future::Future;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::settings::RetrySettings;

/// Runs an upstream request with a bounded number of attempts.
///
/// - Transient failures (`Network`, `RateLimited`) are retried until
///   `max_attempts` is reached; the last error is then returned unchanged.
/// - Anything else (401, 404, parse errors…) is returned immediately.
/// - The wait before a retry is `base_delay`, multiplied after a 429.
///   No jitter and no cap beyond the attempt count.
///
/// Requests run strictly one after another: at most one in flight per call.
#[derive(Debug, Clone, Default)]
pub struct RetryingHttpClient {
    settings: RetrySettings,
}

impl RetryingHttpClient {
    pub fn new(settings: RetrySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RetrySettings {
        &self.settings
    }

    /// How long to wait after `error` before the next attempt.
    pub fn delay_after(&self, error: &CoreError) -> Duration {
        let base = Duration::from_millis(self.settings.base_delay_ms);
        match error {
            CoreError::RateLimited => base * self.settings.rate_limit_multiplier,
            _ => base,
        }
    }

    /// Execute `request`, retrying transient failures.
    pub async fn execute<F, Fut, T>(&self, mut request: F) -> Result<T, CoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match request().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() || attempt >= max_attempts => return Err(e),
                Err(e) => {
                    let delay = self.delay_after(&e);
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient upstream failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
