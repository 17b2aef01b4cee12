//! Subscriber installation is idempotent and does not disturb the engine.

use lens_core::config::ObservabilityConfig;
use lens_core::models::{EdgeSpec, NodeSpec, NodeType, Relation};
use lens_graph::{LineageEngine, TraversalQuery};

#[test]
fn repeated_initialization_is_safe() {
    lens_observability::init_from_config(&ObservabilityConfig::default());
    lens_observability::init_tracing();
    lens_observability::init_tracing_with_filter("lens=trace");

    let engine = LineageEngine::new();
    engine.upsert_node(NodeSpec::new("a", NodeType::Table)).unwrap();
    engine.upsert_node(NodeSpec::new("b", NodeType::Report)).unwrap();
    engine.upsert_edge(EdgeSpec::new("a", "b", Relation::Feeds)).unwrap();
    let summary = engine.impact("a", &TraversalQuery::default()).unwrap();
    assert_eq!(summary.total_affected, 1);
}
