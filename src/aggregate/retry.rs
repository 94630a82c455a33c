use std::{future::Future, time::Duration};

use async_trait::async_trait;

use crate::error::{ApiError, Result, WayfinderError};

/// Source of the backoff sleep. Tests inject a clock that records delays
/// instead of waiting them out.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Retry budget and the fixed leeway added on top of `Retry-After`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub leeway: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            leeway: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before the next attempt. `None` means retry immediately.
    ///
    /// `Retry-After` is server supplied, so the sum saturates instead of
    /// overflowing.
    pub fn backoff_for(&self, error: &ApiError) -> Option<Duration> {
        error
            .retry_after()
            .map(|seconds| Duration::from_secs(seconds).saturating_add(self.leeway))
    }
}

/// Attempt counter of one in-flight `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub attempts: u32,
    pub max_attempts: u32,
}

impl RetryState {
    pub fn new(policy: &RetryPolicy) -> Self {
        Self {
            attempts: 0,
            max_attempts: policy.max_retries.saturating_add(1),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.max_attempts
    }
}

enum Phase<T> {
    Attempting,
    Backoff(Duration),
    Succeeded(T),
    Exhausted(ApiError),
}

/// Runs a single API call with bounded, rate-limit aware retry.
///
/// A rate limited attempt waits for the server supplied `Retry-After` plus the
/// policy leeway. Any other failure is retried right away. There is no jitter
/// and no computed backoff. Once `max_retries + 1` attempts have failed the
/// last error is returned inside [`WayfinderError::RetryExhausted`].
#[derive(Debug, Clone)]
pub struct RetryExecutor<C = TokioClock> {
    policy: RetryPolicy,
    clock: C,
}

impl RetryExecutor<TokioClock> {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            clock: TokioClock,
        }
    }
}

impl<C: Clock> RetryExecutor<C> {
    pub fn with_clock(policy: RetryPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Invokes `call` until it succeeds or the budget is spent.
    ///
    /// `label` only shows up in log output.
    pub async fn execute<T, F, Fut>(&self, label: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, ApiError>>,
    {
        let mut state = RetryState::new(&self.policy);
        let mut phase = Phase::Attempting;

        loop {
            phase = match phase {
                Phase::Attempting => {
                    state.attempts += 1;
                    match call().await {
                        Ok(value) => Phase::Succeeded(value),
                        Err(err) if state.is_exhausted() => Phase::Exhausted(err),
                        Err(err) => match self.policy.backoff_for(&err) {
                            Some(delay) => {
                                log::debug!(
                                    "{label}: {err}, sleeping {}ms before attempt {} of {}",
                                    delay.as_millis(),
                                    state.attempts + 1,
                                    state.max_attempts
                                );
                                Phase::Backoff(delay)
                            }
                            None => {
                                log::debug!(
                                    "{label}: {err}, retrying (attempt {} of {})",
                                    state.attempts + 1,
                                    state.max_attempts
                                );
                                Phase::Attempting
                            }
                        },
                    }
                }
                Phase::Backoff(delay) => {
                    self.clock.sleep(delay).await;
                    Phase::Attempting
                }
                Phase::Succeeded(value) => return Ok(value),
                Phase::Exhausted(source) => {
                    log::warn!("{label}: giving up after {} attempts", state.attempts);
                    return Err(WayfinderError::RetryExhausted {
                        attempts: state.attempts,
                        source,
                    });
                }
            };
        }
    }
}
