//! Policies shared by the Conduit client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: the JSON serialization policy (naming, converters)
//! - `runtime`: async resilience (retry policy with cancellation)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod serialization;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use resilience::{Backoff, RetryAttempt, RetryError, RetryPolicy, TransientFailure};
#[cfg(feature = "foundation")]
pub use serialization::{Converter, NamingConvention, SerializationPolicy};
