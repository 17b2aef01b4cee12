use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Attributes;

/// The closed set of asset kinds tracked in lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Table,
    View,
    Report,
    Dataset,
    System,
    Column,
}

impl NodeType {
    pub const COUNT: usize = 6;

    pub const ALL: [NodeType; 6] = [
        Self::Table,
        Self::View,
        Self::Report,
        Self::Dataset,
        Self::System,
        Self::Column,
    ];

    /// Parse from string, case-insensitive (adapters emit both `TABLE` and `table`).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Some(Self::Table),
            "view" => Some(Self::View),
            "report" => Some(Self::Report),
            "dataset" => Some(Self::Dataset),
            "system" => Some(Self::System),
            "column" => Some(Self::Column),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::Report => "report",
            Self::Dataset => "dataset",
            Self::System => "system",
            Self::Column => "column",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A data asset in the lineage graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier. Immutable once created.
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    /// Last time this node was seen by ingestion.
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Display name: the `name` attribute when present, otherwise the id.
    pub fn name(&self) -> &str {
        self.attributes
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or(&self.id)
    }
}
