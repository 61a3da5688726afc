//! # Conduit Domain
//!
//! Wire contracts for the workflow-server API clients.
//!
//! This crate contains:
//! - The client error taxonomy and `Result` alias
//! - Wire value types (`VersionOptions`, status enums, request/response DTOs)
//! - Settings structures consumed by the configuration loader
//! - The `WireValue` marker used by the serialization policy
//!
//! ## Architecture
//! - No dependencies on other Conduit crates
//! - Only serde/thiserror/chrono allowed
//! - Pure data, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod wire;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use wire::{WireKind, WireValue};
