//! What to do when persistence fails.

use crate::error::PersistResult;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Local reaction to a persistence failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep the optimistic local state. The next load from the server
    /// corrects any divergence.
    #[default]
    KeepOptimistic,
    /// Undo the local transition, unless a newer local operation has already
    /// superseded it.
    Rollback,
}

/// Retry and reconciliation settings for background persistence.
///
/// Retry delay follows exponential backoff: `base * 2^(retry - 1)` capped at
/// `backoff_max`. With the defaults and retries enabled:
/// - 1st retry: 500ms
/// - 2nd retry: 1s
/// - 3rd retry: 2s
/// - ... up to 8s
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    pub on_failure: FailurePolicy,
    /// Extra attempts after the first failure. `0` means fire once.
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            on_failure: FailurePolicy::KeepOptimistic,
            max_retries: 0,
            backoff_base: Duration::from_millis(500),
            backoff_max: Duration::from_secs(8),
        }
    }
}

impl SyncPolicy {
    /// Delay before retry number `retry` (1-based).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let exponent = (retry - 1).min(31);
        let factor = 1u32 << exponent;
        self.backoff_base
            .checked_mul(factor)
            .map_or(self.backoff_max, |delay| delay.min(self.backoff_max))
    }

    /// Run `attempt` until it succeeds or retries are exhausted.
    ///
    /// Returns the last result and the number of attempts made.
    pub(crate) async fn run<F, Fut>(&self, mut attempt: F) -> (PersistResult<()>, u32)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = PersistResult<()>>,
    {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match attempt().await {
                Ok(()) => return (Ok(()), attempts),
                Err(err) if attempts > self.max_retries => return (Err(err), attempts),
                Err(err) => {
                    let delay = self.backoff_delay(attempts);
                    debug!(
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Persist failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
