//! Durable final write — bounded retries for the last display update.
//!
//! Best effort: every failed attempt is logged, and after the last one the
//! write is abandoned without an error. Nothing downstream depends on it.

use std::future::Future;

use pulsecast_core::{ChatSurface, MessageHandle, SurfaceError};
use tracing::{debug, error, warn};

use crate::settings::RetryPolicy;

/// How a retried operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Delivered { attempts: u32 },
    Abandoned { attempts: u32 },
}

impl RetryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Delivered { attempts } | Self::Abandoned { attempts } => *attempts,
        }
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` is reached, sleeping
/// `policy.delay` between attempts.
pub async fn retry_with<F, Fut>(policy: &RetryPolicy, mut op: F) -> RetryOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), SurfaceError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(()) => {
                if attempt > 1 {
                    debug!(attempt, "Final write succeeded after retry");
                }
                return RetryOutcome::Delivered { attempts: attempt };
            }
            Err(e) => {
                warn!(attempt, max_attempts, error = %e, "Final write attempt failed");
                if attempt >= max_attempts {
                    error!(attempts = attempt, "Giving up on final write");
                    return RetryOutcome::Abandoned { attempts: attempt };
                }
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

/// Overwrite `handle` with `text`, retrying per `policy`.
pub async fn final_write(
    surface: &dyn ChatSurface,
    channel: &str,
    handle: &MessageHandle,
    text: &str,
    policy: &RetryPolicy,
) -> RetryOutcome {
    retry_with(policy, || surface.update(channel, handle, text)).await
}
