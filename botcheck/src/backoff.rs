//! Flood backoff: one retry after the wait the transport asked for.

use std::future::Future;
use std::time::Duration;

use botcheck_core::{HarnessError, Result};
use tokio::time::{sleep, timeout};
use tracing::warn;

/// Runs `op`; if the transport throttles it, sleeps `retry_after + margin` and runs it exactly once
/// more. A second throttle is returned to the caller unchanged.
pub async fn retry_once_on_flood<T, F, Fut>(margin: Duration, action: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match op().await {
        Err(HarnessError::Throttled { retry_after }) => {
            let wait = retry_after.saturating_add(margin);
            warn!(
                action,
                retry_after_ms = retry_after.as_millis() as u64,
                wait_ms = wait.as_millis() as u64,
                "Throttled by transport, retrying once"
            );
            sleep(wait).await;
            op().await
        }
        other => other,
    }
}

/// Awaits one transport call for at most `limit`. A call still pending then is dropped and
/// reported as a transport error.
pub async fn bounded<T, Fut>(limit: Duration, action: &str, call: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    match timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                action,
                limit_ms = limit.as_millis() as u64,
                "Transport call did not complete in time"
            );
            Err(HarnessError::Transport(format!(
                "{} did not complete within {:?}",
                action, limit
            )))
        }
    }
}
