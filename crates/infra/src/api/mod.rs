//! Typed workflow-server API surfaces
//!
//! Each surface is a trait describing the remote contract plus an adapter
//! struct that builds requests and decodes responses over a
//! [`RestClient`](crate::registry::RestClient).

pub mod activity_descriptors;
pub mod client;
pub mod features;
pub mod workflow_definitions;
pub mod workflow_instances;

pub use activity_descriptors::{ActivityDescriptorsApi, ActivityDescriptorsClient};
pub use client::{
    register_authenticated_workflow_apis, register_workflow_apis, WorkflowServerClient,
};
pub use features::{FeaturesApi, FeaturesClient};
pub use workflow_definitions::{WorkflowDefinitionsApi, WorkflowDefinitionsClient};
pub use workflow_instances::{WorkflowInstancesApi, WorkflowInstancesClient};
