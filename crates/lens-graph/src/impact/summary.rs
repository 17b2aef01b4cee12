use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lens_core::config::RiskThresholds;
use lens_core::models::{Direction, NodeType};

use crate::traversal::TraversalResult;

/// Business sensitivity of an affected asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Critical,
    Standard,
}

/// Overall risk of a change, graded from the affected counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn assess(total: usize, critical: usize, thresholds: &RiskThresholds) -> Self {
        if total >= thresholds.critical_total || critical >= thresholds.critical_critical_nodes {
            RiskLevel::Critical
        } else if total >= thresholds.high_total || critical >= thresholds.high_critical_nodes {
            RiskLevel::High
        } else if total >= thresholds.medium_total {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Classification of one node in a traversal result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeClassification {
    pub node_id: String,
    pub node_type: NodeType,
    pub depth: usize,
    pub direction: Direction,
    pub criticality: Criticality,
    /// Labels of the rules this node matched (`tag:pii`, `tier=1`).
    pub matched_rules: Vec<String>,
}

/// Traversal result annotated for the narrative layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub result: TraversalResult,
    /// One entry per result node, in result order.
    pub classifications: Vec<NodeClassification>,
    pub total_affected: usize,
    pub critical_affected: usize,
    pub by_type: BTreeMap<NodeType, usize>,
    pub critical_by_type: BTreeMap<NodeType, usize>,
    pub risk_level: RiskLevel,
    pub headline: String,
}

impl ImpactSummary {
    pub fn critical_nodes(&self) -> impl Iterator<Item = &NodeClassification> {
        self.classifications
            .iter()
            .filter(|c| c.criticality == Criticality::Critical)
    }
}

/// One factual sentence describing the summary.
pub(crate) fn headline(result: &TraversalResult, total: usize, critical: usize, risk: RiskLevel) -> String {
    let scope = match result.direction {
        Direction::Downstream => "downstream asset",
        Direction::Upstream => "upstream asset",
        Direction::Both => "connected asset",
    };
    let plural = if total == 1 { "" } else { "s" };
    let mut line = format!(
        "{} has {total} {scope}{plural} ({critical} critical), risk {}",
        result.origin_id,
        risk.as_str()
    );
    if result.truncated {
        line.push_str(&format!(", depth limit {} reached", result.depth_limit));
    }
    line
}
