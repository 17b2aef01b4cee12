use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reference to an asset as a source system describes it.
///
/// Either a ready-made `id`, or the `system`/`schema`/`name` parts from which
/// the normalizer derives a canonical id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRef {
    pub id: Option<String>,
    pub system: Option<String>,
    pub schema: Option<String>,
    pub name: Option<String>,
}

impl AssetRef {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn qualified(system: impl Into<String>, schema: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            system: Some(system.into()),
            schema: schema.map(str::to_string),
            name: Some(name.into()),
        }
    }
}

/// A node as extracted by an adapter, before shape validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNode {
    pub asset: AssetRef,
    pub node_type: Option<String>,
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub tags: Vec<String>,
}

/// An edge as extracted by an adapter, before shape validation.
///
/// When an endpoint type is given, the endpoint is registered implicitly if
/// it does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEdge {
    pub source: AssetRef,
    pub target: AssetRef,
    pub source_type: Option<String>,
    pub target_type: Option<String>,
    pub relation: Option<String>,
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub columns: Vec<RawColumnMapping>,
}

/// A column mapping as extracted by an adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawColumnMapping {
    pub source_column: Option<String>,
    pub target_column: Option<String>,
    pub transformation: Option<String>,
    pub transformation_type: Option<String>,
    pub confidence: Option<f64>,
}

/// Vendor-specific extraction capability. One stateless implementation per
/// catalog or lineage source; the normalizer holds no vendor logic.
pub trait SourceAdapter {
    /// The vendor's record shape.
    type Record;

    /// Adapter name, reported in schema errors.
    fn name(&self) -> &str;

    fn extract_nodes(&self, record: &Self::Record) -> Vec<RawNode>;

    fn extract_edges(&self, record: &Self::Record) -> Vec<RawEdge>;
}
