//! Property tests: termination on cyclic graphs, ancestor/descendant
//! symmetry on DAGs, referential integrity after deletes, idempotent
//! re-ingestion, classification determinism.

use std::collections::HashSet;

use chrono::Utc;
use proptest::prelude::*;

use lens_core::config::CriticalityRules;
use lens_core::models::{EdgeSpec, NodeSpec, NodeType, RecordSpec, Relation};
use lens_graph::graph::stable_graph::IndexedGraph;
use lens_graph::{GraphStore, ImpactClassifier, TraversalEngine, TraversalQuery};

const RELATIONS: [Relation; 4] = Relation::ALL;

fn node_id(i: usize) -> String {
    format!("n{i}")
}

/// Random graph over `n` nodes; cycles and self-loops allowed.
fn build_graph(n: usize, edges: &[(usize, usize, usize)]) -> IndexedGraph {
    let mut graph = IndexedGraph::new();
    let now = Utc::now();
    for i in 0..n {
        let spec = NodeSpec::new(node_id(i), NodeType::Table).with_attribute("tier", (i % 3) as i64);
        graph.upsert_node(spec, now).unwrap();
    }
    for &(s, t, r) in edges {
        if s < n && t < n {
            graph
                .upsert_edge(EdgeSpec::new(node_id(s), node_id(t), RELATIONS[r % 4]), now)
                .unwrap();
        }
    }
    graph
}

/// Random DAG: edges only go from lower to higher index.
fn build_dag(n: usize, edges: &[(usize, usize, usize)]) -> IndexedGraph {
    let forward: Vec<(usize, usize, usize)> = edges
        .iter()
        .filter(|(s, t, _)| s < t)
        .copied()
        .collect();
    build_graph(n, &forward)
}

fn edge_strategy(n: usize) -> impl Strategy<Value = Vec<(usize, usize, usize)>> {
    prop::collection::vec((0..n, 0..n, 0..4_usize), 0..n * 3)
}

// =============================================================================
// Traversal terminates on arbitrary graphs and visits each node at most once
// =============================================================================
proptest! {
    #[test]
    fn traversal_terminates_and_visits_once(
        edges in edge_strategy(20),
        origin in 0_usize..20,
        depth in 0_usize..60,
    ) {
        let graph = build_graph(20, &edges);
        let engine = TraversalEngine::default();
        let query = TraversalQuery::with_depth(depth);
        for result in [
            engine.descendants(&graph, &node_id(origin), &query).unwrap(),
            engine.ancestors(&graph, &node_id(origin), &query).unwrap(),
            engine.lineage(&graph, &node_id(origin), &query).unwrap(),
        ] {
            let ids: HashSet<&str> = result.node_ids().into_iter().collect();
            prop_assert_eq!(ids.len(), result.nodes.len(), "a node was visited twice");
            prop_assert!(!ids.contains(node_id(origin).as_str()), "origin in result");
            prop_assert!(result.nodes.iter().all(|n| n.depth >= 1 && n.depth <= depth.min(50)));
            prop_assert!(result.nodes.windows(2).all(|w| w[0].depth <= w[1].depth));
        }
    }
}

// =============================================================================
// On a DAG, y ∈ descendants(x) ⇔ x ∈ ancestors(y), with equal distance
// =============================================================================
proptest! {
    #[test]
    fn ancestors_and_descendants_are_inverse(edges in edge_strategy(15)) {
        let graph = build_dag(15, &edges);
        let engine = TraversalEngine::default();
        let query = TraversalQuery::default();
        for x in 0..15 {
            let down = engine.descendants(&graph, &node_id(x), &query).unwrap();
            for reached in &down.nodes {
                let up = engine.ancestors(&graph, &reached.node.id, &query).unwrap();
                prop_assert_eq!(up.depth_of(&node_id(x)), Some(reached.depth));
            }
        }
    }
}

// =============================================================================
// Every reported edge connects nodes one layer apart
// =============================================================================
proptest! {
    #[test]
    fn reported_edges_lie_on_shortest_paths(edges in edge_strategy(15), origin in 0_usize..15) {
        let graph = build_graph(15, &edges);
        let origin_id = node_id(origin);
        let result = TraversalEngine::default()
            .descendants(&graph, &origin_id, &TraversalQuery::default())
            .unwrap();
        let depth = |id: &str| if id == origin_id { Some(0) } else { result.depth_of(id) };
        for edge in &result.edges {
            let s = depth(&edge.source_id);
            let t = depth(&edge.target_id);
            prop_assert!(s.is_some() && t.is_some());
            prop_assert_eq!(s.unwrap() + 1, t.unwrap());
        }
    }
}

// =============================================================================
// After deleteNode, no edge references the deleted node
// =============================================================================
proptest! {
    #[test]
    fn delete_leaves_no_dangling_edges(
        edges in edge_strategy(12),
        victims in prop::collection::vec(0_usize..12, 1..6),
    ) {
        let store = GraphStore::from_snapshot(build_graph(12, &edges).snapshot()).unwrap();
        for v in &victims {
            store.delete_node(&node_id(*v)).unwrap();
        }
        let snapshot = store.snapshot().unwrap();
        let alive: HashSet<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        for edge in &snapshot.edges {
            prop_assert!(alive.contains(edge.source_id.as_str()));
            prop_assert!(alive.contains(edge.target_id.as_str()));
        }
        for v in &victims {
            let id = node_id(*v);
            prop_assert!(snapshot.edges.iter().all(|e| e.source_id != id && e.target_id != id));
        }
    }
}

// =============================================================================
// Re-ingesting the same specs leaves node and edge counts unchanged
// =============================================================================
proptest! {
    #[test]
    fn reingestion_is_idempotent(edges in edge_strategy(10)) {
        let mut specs: Vec<RecordSpec> = (0..10)
            .map(|i| RecordSpec::Node(NodeSpec::new(node_id(i), NodeType::View)))
            .collect();
        specs.extend(
            edges
                .iter()
                .map(|&(s, t, r)| RecordSpec::Edge(EdgeSpec::new(node_id(s), node_id(t), RELATIONS[r]))),
        );
        let store = GraphStore::new();
        store.apply_batch(specs.clone()).unwrap();
        let (nodes, edge_count) = (store.node_count().unwrap(), store.edge_count().unwrap());
        let outcome = store.apply_batch(specs).unwrap();
        prop_assert!(outcome.rejected.is_empty());
        prop_assert_eq!(store.node_count().unwrap(), nodes);
        prop_assert_eq!(store.edge_count().unwrap(), edge_count);
    }
}

// =============================================================================
// classify is a pure function of (result, rules)
// =============================================================================
proptest! {
    #[test]
    fn classification_is_deterministic(edges in edge_strategy(15), origin in 0_usize..15) {
        let graph = build_graph(15, &edges);
        let result = TraversalEngine::default()
            .lineage(&graph, &node_id(origin), &TraversalQuery::default())
            .unwrap();
        let classifier = ImpactClassifier::with_rules(CriticalityRules::default().with_attribute("tier", 0));
        let first = serde_json::to_string(&classifier.classify(&result)).unwrap();
        let second = serde_json::to_string(&classifier.classify(&result.clone())).unwrap();
        prop_assert_eq!(first, second);

        let summary = classifier.classify(&result);
        let expected = result
            .nodes
            .iter()
            .filter(|n| n.node.attributes.get("tier").is_some_and(|v| v.matches(&0_i64.into())))
            .count();
        prop_assert_eq!(summary.critical_affected, expected);
    }
}
