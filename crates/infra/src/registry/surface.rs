//! API surface identity and binding

use std::fmt;

use super::rest::RestClient;

/// Identifies one remote API contract by its static name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApiSurfaceDescriptor {
    name: &'static str,
}

impl ApiSurfaceDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for ApiSurfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A typed adapter that can be bound over a [`RestClient`].
///
/// Implemented by the adapter struct of each surface; the registry keys its
/// registrations by [`ApiSurface::NAME`].
pub trait ApiSurface: Sized {
    /// Registration name, e.g. `"WorkflowDefinitionsApi"`
    const NAME: &'static str;

    fn descriptor() -> ApiSurfaceDescriptor {
        ApiSurfaceDescriptor::new(Self::NAME)
    }

    /// Wrap a configured client.
    fn bind(client: RestClient) -> Self;
}
