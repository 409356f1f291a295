use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often a request is retried after a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retry attempts after the first one
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: usize, delay_ms: u64) -> Self {
        Self {
            retries,
            delay: Duration::from_millis(delay_ms),
        }
    }

    /// Runs `operation` until it succeeds, fails with an error that is not
    /// worth retrying, or runs out of attempts. Only connect and timeout
    /// errors are retried.
    pub async fn run<F, Fut, T>(&self, target: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, reqwest::Error>>,
    {
        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(val) => return Ok(val),
                Err(err) => {
                    let transient = err.is_connect() || err.is_timeout();
                    if !transient || attempt > self.retries {
                        return Err(err.into());
                    }
                    debug!(
                        "Attempt {}/{} for {} failed: {}. Retrying...",
                        attempt, self.retries, target, err
                    );
                    attempt += 1;
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
