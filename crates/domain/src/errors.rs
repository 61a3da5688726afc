//! Error types used throughout the client stack

use thiserror::Error;

/// Categories of client errors, stable enough for logging labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorCategory {
    /// Missing registration, missing credential, invalid URL
    Config,
    /// Unparseable enum or version-options token, malformed JSON
    Serialization,
    /// Network failures and 5xx/408 responses - retried
    Transient,
    /// 4xx-class responses and other non-retriable failures
    Permanent,
    /// Caller-initiated abort
    Cancelled,
}

impl ClientErrorCategory {
    /// Label suitable for structured log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Serialization => "serialization",
            Self::Transient => "transient",
            Self::Permanent => "permanent",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Main error type for API client operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transient transport error: {message}")]
    Transient { status: Option<u16>, message: String },

    #[error("Permanent transport error: {message}")]
    Permanent { status: Option<u16>, message: String },

    #[error("Operation cancelled")]
    Cancelled,
}

impl ClientError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Shorthand for a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Transient failure without an HTTP status (connect, timeout, reset).
    pub fn network(message: impl Into<String>) -> Self {
        Self::Transient { status: None, message: message.into() }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ClientErrorCategory {
        match self {
            Self::Config(_) => ClientErrorCategory::Config,
            Self::Serialization(_) => ClientErrorCategory::Serialization,
            Self::Transient { .. } => ClientErrorCategory::Transient,
            Self::Permanent { .. } => ClientErrorCategory::Permanent,
            Self::Cancelled => ClientErrorCategory::Cancelled,
        }
    }

    /// Whether the retry policy may re-attempt the failed call.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    /// HTTP status code attached to a transport error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transient { status, .. } | Self::Permanent { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
