//! Resilience patterns for transient HTTP failures
//!
//! Only retry is provided: a fixed retry count with exponential backoff,
//! generic over the error type through [`TransientFailure`]. There is no
//! circuit breaker; calls never share failure state.

pub mod retry;

// Re-export retry types
pub use retry::{Backoff, RetryAttempt, RetryError, RetryPolicy, TransientFailure};
