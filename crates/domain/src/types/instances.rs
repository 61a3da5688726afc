//! Workflow instance contracts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paging::OrderDirection;
use super::version_options::VersionOptions;
use crate::wire::{WireKind, WireValue};

/// Coarse lifecycle state of a workflow instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowStatus {
    Running,
    Finished,
}

/// Fine-grained lifecycle state of a workflow instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkflowSubStatus {
    Pending,
    Executing,
    Suspended,
    Finished,
    Cancelled,
    Faulted,
}

/// Sort key for workflow instance listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderByWorkflowInstance {
    Created,
    UpdatedAt,
    Finished,
    Name,
}

impl WireValue for WorkflowStatus {
    const KIND: WireKind = WireKind::Enum;
}

impl WireValue for WorkflowSubStatus {
    const KIND: WireKind = WireKind::Enum;
}

impl WireValue for OrderByWorkflowInstance {
    const KIND: WireKind = WireKind::Enum;
}

/// Body of `POST workflow-instances`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListWorkflowInstancesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub definition_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_statuses: Vec<WorkflowSubStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByWorkflowInstance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_direction: Option<OrderDirection>,
}

/// Listing projection of a workflow instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstanceSummary {
    pub id: String,
    pub definition_id: String,
    pub definition_version_id: String,
    pub version: i32,
    pub status: WorkflowStatus,
    pub sub_status: WorkflowSubStatus,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub incident_count: i32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Full workflow instance; execution state is kept as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub id: String,
    pub definition_id: String,
    pub definition_version_id: String,
    pub version: i32,
    pub status: WorkflowStatus,
    pub sub_status: WorkflowSubStatus,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub workflow_state: serde_json::Value,
}
