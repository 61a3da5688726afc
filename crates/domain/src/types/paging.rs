//! Paging envelopes shared by list endpoints

use serde::{Deserialize, Serialize};

use crate::wire::{WireKind, WireValue};

/// Page of results with the total number of matching items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedListResponse<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

/// Unpaged list of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub count: i64,
}

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

impl WireValue for OrderDirection {
    const KIND: WireKind = WireKind::Enum;
}
