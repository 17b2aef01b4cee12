use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{AttributeValue, Attributes, ColumnMapping, NodeType, Relation};

/// Canonical request to create or merge a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Emitted for an edge endpoint rather than an explicit registration.
    /// An implicit spec creates the node when absent and never modifies an
    /// existing one.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub implicit: bool,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            attributes: Attributes::new(),
            tags: BTreeSet::new(),
            implicit: false,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn implicit(mut self) -> Self {
        self.implicit = true;
        self
    }
}

/// Canonical request to create or update an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub source_id: String,
    pub target_id: String,
    pub relation: Relation,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnMapping>,
}

impl EdgeSpec {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, relation: Relation) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation,
            attributes: Attributes::new(),
            columns: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_column(mut self, mapping: ColumnMapping) -> Self {
        self.columns.push(mapping);
        self
    }
}

/// One normalized ingestion output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordSpec {
    Node(NodeSpec),
    Edge(EdgeSpec),
}
