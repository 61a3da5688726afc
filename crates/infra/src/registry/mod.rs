//! Client registration and typed request plumbing
//!
//! An [`ApiRegistry`] is owned by the composition root. Each API surface is
//! registered once at startup with its [`ClientOptions`]; afterwards
//! [`ApiRegistry::create_client`] binds the surface's adapter over a
//! [`RestClient`] that shares the registry's serialization policy.

pub mod api_registry;
pub mod options;
pub mod rest;
pub mod surface;

pub use api_registry::ApiRegistry;
pub use options::{ClientOptions, Credential, RequestConfigurator, RequestContext};
pub use rest::{ApiRequest, RestClient};
pub use surface::{ApiSurface, ApiSurfaceDescriptor};
