use chrono::Utc;
use criterion::{criterion_group, criterion_main, Criterion};

use lens_core::config::CriticalityRules;
use lens_core::models::{EdgeSpec, NodeSpec, NodeType, Relation};
use lens_graph::graph::stable_graph::IndexedGraph;
use lens_graph::{ImpactClassifier, TraversalEngine, TraversalQuery};

/// ~1K edges: 200 nodes, up to 5 forward edges each, plus a back edge every
/// 20 nodes so the graph has cycles.
fn build_1k_edge_graph() -> IndexedGraph {
    let mut graph = IndexedGraph::new();
    let now = Utc::now();
    let n = 200;
    for i in 0..n {
        let spec = NodeSpec::new(format!("n{i}"), NodeType::Table).with_attribute("tier", (i % 4) as i64);
        graph.upsert_node(spec, now).unwrap();
    }
    let mut count = 0;
    for i in 0..n {
        for j in 1..=5 {
            let target = i + j;
            if target < n {
                graph
                    .upsert_edge(EdgeSpec::new(format!("n{i}"), format!("n{target}"), Relation::Feeds), now)
                    .unwrap();
                count += 1;
            }
        }
        if i >= 20 && i % 20 == 0 {
            graph
                .upsert_edge(EdgeSpec::new(format!("n{i}"), format!("n{}", i - 20), Relation::Copies), now)
                .unwrap();
            count += 1;
        }
    }
    assert!(count >= 900, "Should have ~1K edges, got {count}");
    graph
}

fn bench_descendants_depth_5(c: &mut Criterion) {
    let graph = build_1k_edge_graph();
    let engine = TraversalEngine::default();
    let query = TraversalQuery::with_depth(5);

    c.bench_function("descendants_depth_5_1k_edges", |b| {
        b.iter(|| engine.descendants(&graph, "n0", &query).unwrap());
    });
}

fn bench_lineage_unbounded(c: &mut Criterion) {
    let graph = build_1k_edge_graph();
    let engine = TraversalEngine::default();
    let query = TraversalQuery::default();

    c.bench_function("lineage_unbounded_1k_edges", |b| {
        b.iter(|| engine.lineage(&graph, "n100", &query).unwrap());
    });
}

fn bench_classify(c: &mut Criterion) {
    let graph = build_1k_edge_graph();
    let result = TraversalEngine::default()
        .descendants(&graph, "n0", &TraversalQuery::default())
        .unwrap();
    let classifier = ImpactClassifier::with_rules(CriticalityRules::default().with_attribute("tier", 1));

    c.bench_function("classify_200_nodes", |b| {
        b.iter(|| classifier.classify(&result));
    });
}

criterion_group!(benches, bench_descendants_depth_5, bench_lineage_unbounded, bench_classify);
criterion_main!(benches);
