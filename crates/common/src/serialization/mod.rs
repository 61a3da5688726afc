//! JSON serialization policy shared by every registered API client
//!
//! Field names are fixed at compile time by the wire types
//! (`#[serde(rename_all = "camelCase")]`); the policy owns everything decided
//! at runtime: query-parameter naming, scalar token converters and the body
//! codec.

pub mod naming;
pub mod policy;

pub use naming::NamingConvention;
pub use policy::{Converter, SerializationPolicy, SerializationPolicyBuilder};
