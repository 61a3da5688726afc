//! # Conduit Infrastructure
//!
//! Everything that performs I/O on behalf of the workflow-server clients.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpClient`] with retry and cancellation
//! - The [`ApiRegistry`] that registers API surfaces and creates clients
//! - Typed adapters for the workflow-server API surfaces
//! - Configuration loading and tracing initialisation
//!
//! ## Architecture
//! - Policies come from `conduit-common`, wire types from `conduit-domain`
//! - External errors are converted in [`errors`] and never leak past it

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod registry;

// Re-export commonly used items
pub use api::{
    register_authenticated_workflow_apis, register_workflow_apis, ActivityDescriptorsApi,
    ActivityDescriptorsClient, FeaturesApi, FeaturesClient, WorkflowDefinitionsApi,
    WorkflowDefinitionsClient, WorkflowInstancesApi, WorkflowInstancesClient,
    WorkflowServerClient,
};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
pub use registry::{
    ApiRegistry, ApiRequest, ApiSurface, ApiSurfaceDescriptor, ClientOptions, Credential,
    RequestConfigurator, RequestContext, RestClient,
};
