//! Bidirectional traversal: union of upstream (ancestors) and downstream
//! (descendants).

use std::collections::{HashMap, HashSet};

use petgraph::stable_graph::NodeIndex;

use lens_core::models::Direction;

use crate::graph::stable_graph::IndexedGraph;

use super::bfs::{self, EdgeFilter};
use super::{TraversalNode, TraversalResult};

/// Trace both directions and merge. A node reached both ways keeps its
/// shorter distance; at equal distance it is tagged `Both`. Edges are those
/// of the run each node's distance came from.
pub fn trace(
    graph: &IndexedGraph,
    origin: NodeIndex,
    origin_id: &str,
    max_depth: usize,
    filter: &EdgeFilter,
) -> TraversalResult {
    let upstream = bfs::trace(graph, origin, origin_id, Direction::Upstream, max_depth, filter);
    let downstream = bfs::trace(graph, origin, origin_id, Direction::Downstream, max_depth, filter);

    let mut result = TraversalResult::empty(origin_id, Direction::Both, max_depth);
    result.truncated = upstream.truncated || downstream.truncated;
    result.max_depth_reached = upstream.max_depth_reached.max(downstream.max_depth_reached);

    // Deduplicate by id, keeping the shorter depth.
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut nodes: Vec<TraversalNode> = Vec::new();
    for candidate in upstream.nodes.into_iter().chain(downstream.nodes) {
        match position.get(&candidate.node.id) {
            None => {
                position.insert(candidate.node.id.clone(), nodes.len());
                nodes.push(candidate);
            }
            Some(&at) => {
                let existing = &mut nodes[at];
                if candidate.depth < existing.depth {
                    *existing = candidate;
                } else if candidate.depth == existing.depth {
                    existing.direction = Direction::Both;
                }
            }
        }
    }
    nodes.sort_by_key(|n| n.depth);
    result.nodes = nodes;

    // Keep an edge only if the node it reached kept the distance from the
    // run that found it.
    let kept: HashMap<&str, Direction> = result
        .nodes
        .iter()
        .map(|n| (n.node.id.as_str(), n.direction))
        .collect();
    let reached_by = |id: &str, run: Direction| {
        kept.get(id)
            .is_some_and(|&dir| dir == run || dir == Direction::Both)
    };
    let mut seen = HashSet::new();
    let edges: Vec<_> = upstream
        .edges
        .into_iter()
        .filter(|e| reached_by(e.source_id.as_str(), Direction::Upstream))
        .chain(
            downstream
                .edges
                .into_iter()
                .filter(|e| reached_by(e.target_id.as_str(), Direction::Downstream)),
        )
        .filter(|e| seen.insert(e.key()))
        .collect();
    result.edges = edges;

    result
}
