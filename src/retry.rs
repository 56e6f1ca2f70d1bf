//! Bounded exponential backoff for transient server errors.
//!
//! Only a 5xx answer is worth retrying: the server may be restarting Chromium
//! or LibreOffice. Everything else (4xx, local validation, transport failure)
//! is returned from the first attempt without sleeping.
//!
//! With the defaults (5 attempts, 5 s initial wait, ×2) the schedule is
//! 5 s, 10 s, 20 s, 40 s between attempts; the fifth failure is terminal and
//! surfaces as [`GotenbergError::MaxRetriesExceeded`].

use crate::error::{GotenbergError, Result};
use std::future::Future;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

/// How many times to attempt a request and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first. Default: 5.
    pub max_attempts: u32,
    /// Sleep before the second attempt. Default: 5 s.
    pub initial_wait: Duration,
    /// Factor applied to the wait after every sleep. Default: 2.0.
    pub backoff_scale: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_wait: Duration::from_secs(5),
            backoff_scale: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_wait: Duration, backoff_scale: f64) -> Result<Self> {
        if max_attempts == 0 {
            return Err(GotenbergError::InvalidConfig(
                "max_attempts must be ≥ 1".into(),
            ));
        }
        if !backoff_scale.is_finite() || backoff_scale < 0.0 {
            return Err(GotenbergError::InvalidConfig(format!(
                "backoff_scale must be a finite number ≥ 0, got {backoff_scale}"
            )));
        }
        Ok(Self {
            max_attempts,
            initial_wait,
            backoff_scale,
        })
    }

    /// Like [`RetryPolicy::new`] with the initial wait given in seconds.
    pub fn from_secs_f64(max_attempts: u32, initial_wait_secs: f64, backoff_scale: f64) -> Result<Self> {
        if initial_wait_secs < 0.0 {
            return Err(GotenbergError::NegativeWaitDuration {
                secs: initial_wait_secs,
            });
        }
        let initial_wait = Duration::try_from_secs_f64(initial_wait_secs).map_err(|e| {
            GotenbergError::InvalidConfig(format!("initial wait {initial_wait_secs}s: {e}"))
        })?;
        Self::new(max_attempts, initial_wait, backoff_scale)
    }

    /// Make exactly one attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// The sleeps between attempts, in order. Yields `max_attempts - 1` entries.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let factor = self.backoff_scale;
        std::iter::successors(Some(self.initial_wait), move |w| Some(scale(*w, factor)))
            .take(self.max_attempts.saturating_sub(1) as usize)
    }

    /// Sum of [`RetryPolicy::delays`]: the worst-case time spent sleeping.
    ///
    /// Saturates at `Duration::MAX`. Once the wait stops changing the rest
    /// of the schedule is multiplied out instead of walked.
    pub fn total_wait(&self) -> Duration {
        let mut total = Duration::ZERO;
        let mut wait = self.initial_wait;
        let mut remaining = self.max_attempts.saturating_sub(1);
        while remaining > 0 && total < Duration::MAX {
            let next = scale(wait, self.backoff_scale);
            if next == wait {
                return total.saturating_add(wait.saturating_mul(remaining));
            }
            total = total.saturating_add(wait);
            wait = next;
            remaining -= 1;
        }
        total
    }
}

fn scale(wait: Duration, factor: f64) -> Duration {
    Duration::try_from_secs_f64(wait.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

/// Run `op` until it succeeds, fails with something other than a 5xx, or the
/// attempts run out.
pub(crate) async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut wait = policy.initial_wait;

    for attempt in 1..=policy.max_attempts {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("Request succeeded on attempt {}/{}", attempt, policy.max_attempts);
                }
                return Ok(value);
            }
            Err(GotenbergError::HttpStatus { status, response }) if status.is_server_error() => {
                if attempt == policy.max_attempts {
                    warn!(
                        "Attempt {}/{} failed with HTTP {}, giving up",
                        attempt, policy.max_attempts, status
                    );
                    return Err(GotenbergError::MaxRetriesExceeded {
                        attempts: attempt,
                        response,
                    });
                }
                warn!(
                    "Attempt {}/{} failed with HTTP {}, retrying in {:.1}s",
                    attempt,
                    policy.max_attempts,
                    status,
                    wait.as_secs_f64()
                );
                sleep(wait).await;
                wait = scale(wait, policy.backoff_scale);
            }
            Err(e) => return Err(e),
        }
    }

    Err(GotenbergError::Internal(
        "retry loop finished without a result".into(),
    ))
}
