//! Wire types for the workflow-server API surfaces
//!
//! Every DTO uses camelCase field names on the wire; enums travel as their
//! member names.

pub mod descriptors;
pub mod instances;
pub mod paging;
pub mod version_options;
pub mod workflow;

pub use descriptors::{ActivityDescriptor, ActivityKind, FeatureDescriptor, InputDescriptor};
pub use instances::{
    ListWorkflowInstancesRequest, OrderByWorkflowInstance, WorkflowInstance,
    WorkflowInstanceSummary, WorkflowStatus, WorkflowSubStatus,
};
pub use paging::{ListResponse, OrderDirection, PagedListResponse};
pub use version_options::VersionOptions;
pub use workflow::{
    ListWorkflowDefinitionsRequest, OrderByWorkflowDefinition, WorkflowDefinition,
    WorkflowDefinitionSummary,
};
