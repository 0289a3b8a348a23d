//! Fixed-delay retry for whole release runs.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info};

/// Run `operation` until it succeeds, sleeping `delay` after each failure.
///
/// `operation` receives the 1-based attempt number. With `max_attempts` set
/// to `None` the loop never gives up; otherwise the error of the last
/// permitted attempt is returned.
///
/// # Errors
///
/// Returns the last error once `max_attempts` attempts have failed.
pub async fn retry_with_delay<T, F, Fut>(
    delay: Duration,
    max_attempts: Option<u32>,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                error!("Attempt {attempt} failed: {e:#}");
                if max_attempts.is_some_and(|max| attempt >= max) {
                    return Err(e);
                }
                info!("Retrying in {}s", delay.as_secs());
                tokio::time::sleep(delay).await;
                attempt = attempt.saturating_add(1);
            }
        }
    }
}
