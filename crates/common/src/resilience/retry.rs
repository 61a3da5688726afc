//! Retry policy with exponential backoff and cooperative cancellation
//!
//! The policy is a plain value: it holds no failure counters and can be
//! copied into every client. Each call re-attempts independently; attempt
//! `n + 1` starts only after attempt `n` failed and the backoff for `n` has
//! elapsed.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use conduit_domain::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_BASE_DELAY_MS};
use conduit_domain::{ClientError, RetrySettings};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// Largest exponent applied to the base delay
const MAX_BACKOFF_EXPONENT: u32 = 30;

/// Errors that the retry policy knows how to classify
pub trait TransientFailure {
    /// Whether the failed attempt may be repeated.
    fn is_transient(&self) -> bool;
}

impl TransientFailure for ClientError {
    fn is_transient(&self) -> bool {
        ClientError::is_transient(self)
    }
}

/// Errors that can occur while executing under a retry policy
#[derive(Debug, Error, PartialEq)]
pub enum RetryError<E> {
    /// The cancellation token fired during an attempt or a backoff wait
    #[error("Operation cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },

    /// Every allowed attempt failed transiently
    #[error("All retry attempts exhausted after {attempts} tries: {error}")]
    Exhausted { attempts: u32, error: E },

    /// The operation failed with a non-transient error
    #[error("Operation failed with non-transient error: {error}")]
    NonTransient { attempts: u32, error: E },
}

impl<E> RetryError<E> {
    /// Number of attempts that were started.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Cancelled { attempts }
            | Self::Exhausted { attempts, .. }
            | Self::NonTransient { attempts, .. } => *attempts,
        }
    }

    /// The last failure, if the operation itself produced one.
    pub fn into_error(self) -> Option<E> {
        match self {
            Self::Cancelled { .. } => None,
            Self::Exhausted { error, .. } | Self::NonTransient { error, .. } => Some(error),
        }
    }
}

impl From<RetryError<ClientError>> for ClientError {
    fn from(err: RetryError<ClientError>) -> Self {
        err.into_error().unwrap_or(ClientError::Cancelled)
    }
}

/// A retry that has been scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAttempt {
    /// Retry number, starting at 1
    pub attempt: u32,
    /// Delay inserted before the retry
    pub delay: Duration,
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Fixed delay between retries
    Fixed(Duration),
    /// `base * 2^attempt`, no jitter, no cap
    Exponential { base: Duration },
}

impl Backoff {
    /// Delay before retry `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Exponential { base } => {
                let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
                base.saturating_mul(1u32 << exponent)
            }
        }
    }
}

/// Fixed retry count plus backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::transient_http()
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::exponential(settings.max_retries, Duration::from_millis(settings.base_delay_ms))
    }
}

impl RetryPolicy {
    /// Policy for transient HTTP failures: 3 retries after 2s, 4s and 8s.
    pub fn transient_http() -> Self {
        Self::exponential(
            DEFAULT_MAX_RETRIES,
            Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        )
    }

    /// `max_retries` retries with delay `base * 2^n` before retry `n`.
    pub fn exponential(max_retries: u32, base: Duration) -> Self {
        Self { max_retries, backoff: Backoff::Exponential { base } }
    }

    /// `max_retries` retries with the same delay before each.
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, backoff: Backoff::Fixed(delay) }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self { max_retries: 0, backoff: Backoff::Fixed(Duration::ZERO) }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Initial attempt plus retries.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Delay before retry `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }

    /// The full delay schedule, one entry per retry.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..=self.max_retries).map(move |attempt| self.delay_for(attempt))
    }

    /// Run `operation` under the policy.
    ///
    /// The closure receives the 1-based attempt number. Transient failures are
    /// retried until the policy is exhausted; any other failure returns at
    /// once. Cancellation interrupts both attempts and backoff waits.
    pub async fn execute<F, Fut, T, E>(
        &self,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: TransientFailure + fmt::Display,
    {
        self.execute_observed(cancel, operation, |_| {}).await
    }

    /// Like [`RetryPolicy::execute`], reporting every scheduled retry to
    /// `on_retry` before the backoff wait starts.
    #[instrument(skip_all, fields(max_retries = self.max_retries))]
    pub async fn execute_observed<F, Fut, T, E, O>(
        &self,
        cancel: &CancellationToken,
        mut operation: F,
        mut on_retry: O,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: TransientFailure + fmt::Display,
        O: FnMut(RetryAttempt),
    {
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(RetryError::Cancelled { attempts: attempt });
            }
            attempt += 1;
            debug!(attempt, max_attempts = self.max_attempts(), "executing operation");

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(attempt, "operation cancelled mid-attempt");
                    return Err(RetryError::Cancelled { attempts: attempt });
                }
                result = operation(attempt) => result,
            };

            let error = match result {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(retries = attempt - 1, "operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            if !error.is_transient() {
                debug!(attempt, %error, "non-transient failure, not retrying");
                return Err(RetryError::NonTransient { attempts: attempt, error });
            }

            if attempt > self.max_retries {
                warn!(attempts = attempt, %error, "all retry attempts exhausted");
                return Err(RetryError::Exhausted { attempts: attempt, error });
            }

            let delay = self.delay_for(attempt);
            warn!(attempt, ?delay, %error, "transient failure, retrying after backoff");
            on_retry(RetryAttempt { attempt, delay });

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!(attempt, "retry abandoned during backoff");
                    return Err(RetryError::Cancelled { attempts: attempt });
                }
                () = tokio::time::sleep(delay) => {}
            }
        }
    }
}
