//! Impact Classifier: annotates a traversal result with per-node
//! criticality and aggregate counts.

pub mod rules;
mod summary;

use std::collections::BTreeMap;

use lens_core::config::{ClassifierConfig, CriticalityRules, RiskThresholds};

use crate::traversal::TraversalResult;

pub use summary::{Criticality, ImpactSummary, NodeClassification, RiskLevel};

/// Pure classifier over a fixed rule set.
#[derive(Debug, Clone, Default)]
pub struct ImpactClassifier {
    rules: CriticalityRules,
    risk: RiskThresholds,
}

impl ImpactClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            rules: config.rules,
            risk: config.risk,
        }
    }

    pub fn with_rules(rules: CriticalityRules) -> Self {
        Self {
            rules,
            risk: RiskThresholds::default(),
        }
    }

    pub fn rules(&self) -> &CriticalityRules {
        &self.rules
    }

    /// Classify every node of `result`. Same input and rules give the same
    /// summary.
    pub fn classify(&self, result: &TraversalResult) -> ImpactSummary {
        let mut classifications = Vec::with_capacity(result.nodes.len());
        let mut by_type = BTreeMap::new();
        let mut critical_by_type = BTreeMap::new();
        let mut critical_affected = 0;

        for reached in &result.nodes {
            let matched = rules::matched_rules(&self.rules, &reached.node);
            let criticality = if matched.is_empty() {
                Criticality::Standard
            } else {
                critical_affected += 1;
                *critical_by_type.entry(reached.node.node_type).or_insert(0) += 1;
                Criticality::Critical
            };
            *by_type.entry(reached.node.node_type).or_insert(0) += 1;
            classifications.push(NodeClassification {
                node_id: reached.node.id.clone(),
                node_type: reached.node.node_type,
                depth: reached.depth,
                direction: reached.direction,
                criticality,
                matched_rules: matched,
            });
        }

        let total_affected = classifications.len();
        let risk_level = RiskLevel::assess(total_affected, critical_affected, &self.risk);
        ImpactSummary {
            headline: summary::headline(result, total_affected, critical_affected, risk_level),
            result: result.clone(),
            classifications,
            total_affected,
            critical_affected,
            by_type,
            critical_by_type,
            risk_level,
        }
    }
}
