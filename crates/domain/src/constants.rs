//! Client constants
//!
//! Centralized location for the defaults shared by settings, the retry policy
//! and the HTTP client builder.

// Transport defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("conduit/", env!("CARGO_PKG_VERSION"));

// Retry defaults: delay(n) = base * 2^n
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 1_000;

// Authorization schemes
pub const API_KEY_SCHEME: &str = "ApiKey";
pub const BEARER_SCHEME: &str = "Bearer";
