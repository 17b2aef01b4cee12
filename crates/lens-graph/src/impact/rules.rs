//! Criticality rule evaluation.

use lens_core::config::CriticalityRules;
use lens_core::models::Node;

/// Rules `node` matches, as `tag:<t>` and `<key>=<value>` labels, in rule
/// order. Empty means the node is not critical.
pub fn matched_rules(rules: &CriticalityRules, node: &Node) -> Vec<String> {
    let tags = rules
        .tags
        .iter()
        .filter(|tag| node.tags.contains(*tag))
        .map(|tag| format!("tag:{tag}"));
    let attributes = rules
        .attribute_equals
        .iter()
        .filter(|(key, expected)| node.attributes.get(*key).is_some_and(|actual| actual.matches(expected)))
        .map(|(key, expected)| format!("{key}={expected}"));
    tags.chain(attributes).collect()
}
