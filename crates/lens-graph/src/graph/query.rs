//! Lookup queries over the node set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lens_core::models::{Node, NodeType};

use super::stable_graph::IndexedGraph;

/// Size of the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Edges whose validity window is still open.
    pub active_edge_count: usize,
    pub nodes_by_type: BTreeMap<NodeType, usize>,
}

pub fn stats(graph: &IndexedGraph) -> GraphStats {
    let mut nodes_by_type = BTreeMap::new();
    for node in graph.graph.node_weights() {
        *nodes_by_type.entry(node.node_type).or_insert(0) += 1;
    }
    GraphStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        active_edge_count: graph.graph.edge_weights().filter(|e| e.is_active()).count(),
        nodes_by_type,
    }
}

/// Nodes of one type, ordered by id, paginated.
pub fn find_by_type(graph: &IndexedGraph, node_type: NodeType, limit: usize, offset: usize) -> Vec<Node> {
    let mut matches: Vec<&Node> = graph
        .graph
        .node_weights()
        .filter(|n| n.node_type == node_type)
        .collect();
    matches.sort_by(|a, b| a.id.cmp(&b.id));
    matches.into_iter().skip(offset).take(limit).cloned().collect()
}

/// Case-insensitive substring search on id and display name, optionally
/// restricted to some node types. An empty term matches everything.
pub fn search(graph: &IndexedGraph, term: &str, node_types: Option<&[NodeType]>, limit: usize) -> Vec<Node> {
    let needle = term.trim().to_lowercase();
    let mut matches: Vec<&Node> = graph
        .graph
        .node_weights()
        .filter(|n| node_types.map_or(true, |types| types.contains(&n.node_type)))
        .filter(|n| {
            n.id.to_lowercase().contains(&needle) || n.name().to_lowercase().contains(&needle)
        })
        .collect();
    matches.sort_by(|a, b| a.id.cmp(&b.id));
    matches.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use lens_core::models::NodeSpec;

    use super::*;

    fn sample() -> IndexedGraph {
        let mut graph = IndexedGraph::new();
        let now = Utc::now();
        for spec in [
            NodeSpec::new("warehouse.orders_raw", NodeType::Table),
            NodeSpec::new("warehouse.customers_raw", NodeType::Table),
            NodeSpec::new("bi.daily_sales", NodeType::Report).with_attribute("name", "Daily Sales Dashboard"),
            NodeSpec::new("warehouse.orders_clean", NodeType::Table),
        ] {
            graph.upsert_node(spec, now).unwrap();
        }
        graph
    }

    #[test]
    fn find_by_type_is_sorted_and_paginated() {
        let graph = sample();
        let ids: Vec<String> = find_by_type(&graph, NodeType::Table, 2, 1)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec!["warehouse.orders_clean", "warehouse.orders_raw"]);
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let graph = sample();
        let hits = search(&graph, "SALES dash", None, 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "bi.daily_sales");
    }

    #[test]
    fn stats_count_by_type() {
        let stats = stats(&sample());
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.edge_count, 0);
        assert_eq!(stats.nodes_by_type.get(&NodeType::Table), Some(&3));
        assert_eq!(stats.nodes_by_type.get(&NodeType::Report), Some(&1));
    }

    #[test]
    fn search_respects_type_filter() {
        let graph = sample();
        let hits = search(&graph, "orders", Some(&[NodeType::Report][..]), 10);
        assert!(hits.is_empty());
        let hits = search(&graph, "orders", Some(&[NodeType::Table][..]), 10);
        assert_eq!(hits.len(), 2);
    }
}
