//! Layered breadth-first traversal in one direction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use petgraph::stable_graph::NodeIndex;

use lens_core::models::{Direction, Edge, Relation};

use crate::graph::stable_graph::IndexedGraph;

use super::{TraversalNode, TraversalResult};

/// Which edges a traversal may follow.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    pub relations: Option<Vec<Relation>>,
    /// Only follow edges valid at this instant. `None` follows all edges.
    pub at: Option<DateTime<Utc>>,
}

impl EdgeFilter {
    pub fn accepts(&self, edge: &Edge) -> bool {
        let relation_ok = self
            .relations
            .as_ref()
            .map_or(true, |relations| relations.contains(&edge.relation));
        let time_ok = self.at.map_or(true, |at| edge.is_valid_at(at));
        relation_ok && time_ok
    }
}

/// Walk from `origin` one layer at a time. A node's depth is fixed the first
/// time it is reached, so each node is expanded at most once and cycles
/// terminate. An edge is kept when it reaches a node exactly one layer
/// further out, which yields every edge on every shortest path.
pub fn trace(
    graph: &IndexedGraph,
    origin: NodeIndex,
    origin_id: &str,
    direction: Direction,
    max_depth: usize,
    filter: &EdgeFilter,
) -> TraversalResult {
    let petgraph_direction = match direction {
        Direction::Upstream => petgraph::Direction::Incoming,
        _ => petgraph::Direction::Outgoing,
    };
    let mut result = TraversalResult::empty(origin_id, direction, max_depth);

    let mut depth_of: HashMap<NodeIndex, usize> = HashMap::new();
    depth_of.insert(origin, 0);
    let mut frontier = vec![origin];
    let mut depth = 0;

    while !frontier.is_empty() {
        if depth >= max_depth {
            result.truncated = frontier.iter().any(|&current| {
                graph
                    .adjacent(current, petgraph_direction)
                    .into_iter()
                    .any(|(next, edge)| filter.accepts(edge) && !depth_of.contains_key(&next))
            });
            break;
        }

        let mut next_frontier = Vec::new();
        for &current in &frontier {
            for (next, edge) in graph.adjacent(current, petgraph_direction) {
                if !filter.accepts(edge) {
                    continue;
                }
                match depth_of.get(&next) {
                    None => {
                        depth_of.insert(next, depth + 1);
                        next_frontier.push(next);
                        result.edges.push(edge.clone());
                        if let Some(node) = graph.graph.node_weight(next) {
                            result.nodes.push(TraversalNode {
                                node: node.clone(),
                                depth: depth + 1,
                                direction,
                            });
                        }
                    }
                    Some(&reached) if reached == depth + 1 => result.edges.push(edge.clone()),
                    Some(_) => {}
                }
            }
        }

        if !next_frontier.is_empty() {
            result.max_depth_reached = depth + 1;
        }
        frontier = next_frontier;
        depth += 1;
    }

    result
}
