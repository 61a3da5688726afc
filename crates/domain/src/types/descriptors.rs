//! Activity and feature descriptors

use serde::{Deserialize, Serialize};

use crate::wire::{WireKind, WireValue};

/// How an activity participates in a workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityKind {
    Action,
    Trigger,
    Job,
    Task,
}

impl WireValue for ActivityKind {
    const KIND: WireKind = WireKind::Enum;
}

/// Describes one input of an activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_browsable: bool,
}

/// Describes an activity type available on the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDescriptor {
    pub type_name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
    pub version: i32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub kind: ActivityKind,
    #[serde(default)]
    pub inputs: Vec<InputDescriptor>,
    #[serde(default)]
    pub is_browsable: bool,
}

/// Describes a server feature module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureDescriptor {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    pub full_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
