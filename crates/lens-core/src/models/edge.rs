use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Attributes, ColumnMapping};

/// The lineage relation carried by an edge. Edges always point from the
/// upstream asset to the downstream one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Target is derived from source.
    DerivesFrom,
    /// Source is transformed into target by a job.
    Transforms,
    /// Source feeds target (consumption).
    Feeds,
    /// Target is a copy of source.
    Copies,
}

impl Relation {
    pub const ALL: [Relation; 4] = [
        Self::DerivesFrom,
        Self::Transforms,
        Self::Feeds,
        Self::Copies,
    ];

    /// Parse from string, case-insensitive.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "derives_from" => Some(Self::DerivesFrom),
            "transforms" => Some(Self::Transforms),
            "feeds" => Some(Self::Feeds),
            "copies" => Some(Self::Copies),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DerivesFrom => "derives_from",
            Self::Transforms => "transforms",
            Self::Feeds => "feeds",
            Self::Copies => "copies",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an edge. At most one edge exists per key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source_id: String,
    pub target_id: String,
    pub relation: Relation,
}

impl EdgeKey {
    pub fn new(source_id: impl Into<String>, target_id: impl Into<String>, relation: Relation) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relation,
        }
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source_id, self.relation, self.target_id)
    }
}

/// A directed lineage relationship from an upstream node to a downstream node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source_id: String,
    pub target_id: String,
    pub relation: Relation,
    #[serde(default)]
    pub attributes: Attributes,
    /// Column-level lineage within this relationship.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<ColumnMapping>,
    /// When this relationship became valid.
    pub valid_from: DateTime<Utc>,
    /// When this relationship stopped being valid (`None` = still valid).
    #[serde(default)]
    pub valid_to: Option<DateTime<Utc>>,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.source_id.clone(), self.target_id.clone(), self.relation)
    }

    /// Whether the edge was in effect at `at`.
    pub fn is_valid_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && self.valid_to.map_or(true, |end| end > at)
    }

    pub fn is_active(&self) -> bool {
        self.valid_to.is_none()
    }
}
