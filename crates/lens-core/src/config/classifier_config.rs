use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::AttributeValue;

/// Criticality predicates. A node matching any rule is critical.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalityRules {
    /// Node is critical if it carries any of these tags.
    pub tags: BTreeSet<String>,
    /// Node is critical if any of these attributes equals the given value.
    pub attribute_equals: BTreeMap<String, AttributeValue>,
}

impl CriticalityRules {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.attribute_equals.is_empty()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attribute_equals.insert(key.into(), value.into());
        self
    }
}

/// Count thresholds used to grade an impact summary's risk level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub medium_total: usize,
    pub high_total: usize,
    pub critical_total: usize,
    pub high_critical_nodes: usize,
    pub critical_critical_nodes: usize,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium_total: defaults::DEFAULT_RISK_MEDIUM_TOTAL,
            high_total: defaults::DEFAULT_RISK_HIGH_TOTAL,
            critical_total: defaults::DEFAULT_RISK_CRITICAL_TOTAL,
            high_critical_nodes: defaults::DEFAULT_RISK_HIGH_CRITICAL_NODES,
            critical_critical_nodes: defaults::DEFAULT_RISK_CRITICAL_CRITICAL_NODES,
        }
    }
}

/// Impact classifier configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub rules: CriticalityRules,
    pub risk: RiskThresholds,
}
