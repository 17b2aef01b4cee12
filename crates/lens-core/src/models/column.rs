use serde::{Deserialize, Serialize};

/// How a target column is produced from its source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationType {
    Passthrough,
    Cast,
    Aggregate,
    Join,
    Custom,
}

impl TransformationType {
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passthrough" => Some(Self::Passthrough),
            "cast" => Some(Self::Cast),
            "aggregate" => Some(Self::Aggregate),
            "join" => Some(Self::Join),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Cast => "cast",
            Self::Aggregate => "aggregate",
            Self::Join => "join",
            Self::Custom => "custom",
        }
    }
}

/// Column-level lineage carried by an edge: one source column flowing into
/// one target column. At most one mapping per (source_column, target_column)
/// on a given edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub source_column: String,
    pub target_column: String,
    /// SQL expression, code, or description of the transformation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_type: Option<TransformationType>,
    /// Confidence in [0, 1] for inferred mappings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl ColumnMapping {
    pub fn new(source_column: impl Into<String>, target_column: impl Into<String>) -> Self {
        Self {
            source_column: source_column.into(),
            target_column: target_column.into(),
            transformation: None,
            transformation_type: None,
            confidence: None,
        }
    }

    pub fn with_transformation(mut self, kind: TransformationType, expression: impl Into<String>) -> Self {
        self.transformation_type = Some(kind);
        self.transformation = Some(expression.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Shape check: both column names present, confidence a finite number
    /// in [0, 1].
    pub fn check(&self) -> Result<(), String> {
        if self.source_column.trim().is_empty() || self.target_column.trim().is_empty() {
            return Err("column mapping needs both source and target column".to_string());
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(format!(
                    "column mapping {} -> {}: confidence {confidence} outside [0, 1]",
                    self.source_column, self.target_column
                ));
            }
        }
        Ok(())
    }

    pub fn same_columns(&self, other: &ColumnMapping) -> bool {
        self.source_column == other.source_column && self.target_column == other.target_column
    }
}

/// Merge `incoming` into `existing`: a mapping for an already-mapped column
/// pair replaces it in place, new pairs are appended in order.
pub fn merge_columns(existing: &mut Vec<ColumnMapping>, incoming: Vec<ColumnMapping>) {
    for mapping in incoming {
        match existing.iter_mut().find(|m| m.same_columns(&mapping)) {
            Some(slot) => *slot = mapping,
            None => existing.push(mapping),
        }
    }
}
