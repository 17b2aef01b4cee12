//! Traversal Engine: upstream lineage (ancestors), downstream impact
//! (descendants), and the union of both.

pub mod bfs;
pub mod bidirectional;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use lens_core::config::TraversalConfig;
use lens_core::errors::{LensError, LensResult};
use lens_core::models::{Direction, Edge, Node, Relation};

use crate::graph::stable_graph::IndexedGraph;

use self::bfs::EdgeFilter;

/// Per-query traversal parameters. Unset fields fall back to the engine's
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalQuery {
    /// Requested depth; clamped to the configured ceiling.
    pub max_depth: Option<usize>,
    /// Only follow these relations. `None` or an empty list follows all.
    pub relations: Option<Vec<Relation>>,
    /// Point in time the lineage is evaluated at (default: now).
    pub as_of: Option<DateTime<Utc>>,
    pub include_invalidated: Option<bool>,
}

impl TraversalQuery {
    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
            ..Self::default()
        }
    }

    pub fn relations(mut self, relations: impl IntoIterator<Item = Relation>) -> Self {
        self.relations = Some(relations.into_iter().collect());
        self
    }

    pub fn as_of(mut self, at: DateTime<Utc>) -> Self {
        self.as_of = Some(at);
        self
    }

    pub fn include_invalidated(mut self, include: bool) -> Self {
        self.include_invalidated = Some(include);
        self
    }
}

/// A node reached by a traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalNode {
    pub node: Node,
    /// Shortest hop distance from the origin.
    pub depth: usize,
    /// Which way it was reached. `Both` when reached at the same distance
    /// upstream and downstream.
    pub direction: Direction,
}

/// Result of a traversal. Nodes are in breadth-first order; the origin is
/// not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalResult {
    pub origin_id: String,
    pub direction: Direction,
    pub nodes: Vec<TraversalNode>,
    /// Every edge lying on some shortest path from the origin to a result node.
    pub edges: Vec<Edge>,
    pub max_depth_reached: usize,
    /// Effective depth limit after clamping.
    pub depth_limit: usize,
    /// Whether reachable nodes were left out because of the depth limit.
    pub truncated: bool,
}

impl TraversalResult {
    pub(crate) fn empty(origin_id: &str, direction: Direction, depth_limit: usize) -> Self {
        Self {
            origin_id: origin_id.to_string(),
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
            max_depth_reached: 0,
            depth_limit,
            truncated: false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.node.id == id)
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().find(|n| n.node.id == id).map(|n| n.depth)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.node.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Stateless traversal over a read-locked graph.
#[derive(Debug, Clone, Default)]
pub struct TraversalEngine {
    config: TraversalConfig,
}

impl TraversalEngine {
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Everything `asset_id` is derived from.
    pub fn ancestors(&self, graph: &IndexedGraph, asset_id: &str, query: &TraversalQuery) -> LensResult<TraversalResult> {
        self.trace(graph, asset_id, Direction::Upstream, query)
    }

    /// Everything affected by a change to `asset_id`.
    pub fn descendants(&self, graph: &IndexedGraph, asset_id: &str, query: &TraversalQuery) -> LensResult<TraversalResult> {
        self.trace(graph, asset_id, Direction::Downstream, query)
    }

    /// Ancestors and descendants together.
    pub fn lineage(&self, graph: &IndexedGraph, asset_id: &str, query: &TraversalQuery) -> LensResult<TraversalResult> {
        self.trace(graph, asset_id, Direction::Both, query)
    }

    pub fn trace(
        &self,
        graph: &IndexedGraph,
        asset_id: &str,
        direction: Direction,
        query: &TraversalQuery,
    ) -> LensResult<TraversalResult> {
        let origin = graph
            .get_node(asset_id)
            .ok_or_else(|| LensError::unknown_asset(asset_id))?;
        let max_depth = self.config.effective_depth(query.max_depth);
        let filter = self.filter_for(query);

        let result = match direction {
            Direction::Upstream | Direction::Downstream => {
                bfs::trace(graph, origin, asset_id, direction, max_depth, &filter)
            }
            Direction::Both => bidirectional::trace(graph, origin, asset_id, max_depth, &filter),
        };

        debug!(
            origin = asset_id,
            direction = %direction,
            max_depth,
            visited = result.nodes.len(),
            edges = result.edges.len(),
            truncated = result.truncated,
            "traversal complete"
        );
        Ok(result)
    }

    fn filter_for(&self, query: &TraversalQuery) -> EdgeFilter {
        let include_invalidated = query
            .include_invalidated
            .unwrap_or(self.config.include_invalidated);
        EdgeFilter {
            relations: query.relations.clone().filter(|r| !r.is_empty()),
            at: if include_invalidated {
                None
            } else {
                Some(query.as_of.unwrap_or_else(Utc::now))
            },
        }
    }
}
