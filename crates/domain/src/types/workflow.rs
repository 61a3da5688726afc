//! Workflow definition contracts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paging::OrderDirection;
use super::version_options::VersionOptions;
use crate::wire::{WireKind, WireValue};

/// Sort key for workflow definition listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderByWorkflowDefinition {
    Name,
    Version,
    Created,
}

impl WireValue for OrderByWorkflowDefinition {
    const KIND: WireKind = WireKind::Enum;
}

/// Query parameters for `GET workflow-definitions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListWorkflowDefinitionsRequest {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub version_options: Option<VersionOptions>,
    pub search_term: Option<String>,
    pub order_by: Option<OrderByWorkflowDefinition>,
    pub order_direction: Option<OrderDirection>,
}

impl ListWorkflowDefinitionsRequest {
    /// First page of `page_size` items.
    pub fn paged(page: u32, page_size: u32) -> Self {
        Self { page: Some(page), page_size: Some(page_size), ..Default::default() }
    }

    pub fn with_version_options(mut self, version_options: VersionOptions) -> Self {
        self.version_options = Some(version_options);
        self
    }
}

/// Listing projection of a workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinitionSummary {
    pub id: String,
    pub definition_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub version: i32,
    #[serde(default)]
    pub is_latest: bool,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// Full workflow definition; the activity graph is kept as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDefinition {
    pub id: String,
    pub definition_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub version: i32,
    #[serde(default)]
    pub is_latest: bool,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_version: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub root: serde_json::Value,
}
