//! petgraph::StableGraph wrapper keyed by asset id.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Directed;

use lens_core::errors::{LensError, LensResult};
use lens_core::models::{
    merge_columns, Attributes, ColumnMapping, Edge, EdgeKey, EdgeSpec, GraphSnapshot, Node, NodeSpec,
    Relation,
};

/// The underlying directed multigraph. Parallel edges are allowed as long as
/// their relations differ.
pub type LineageStableGraph = StableGraph<Node, Edge, Directed>;

/// Graph plus an id → index map for O(1) lookup. Adjacency is indexed in
/// both directions by petgraph, so neighbours cost O(degree) either way.
pub struct IndexedGraph {
    /// The petgraph stable graph.
    pub graph: LineageStableGraph,
    /// Map from node id → NodeIndex.
    pub node_index: HashMap<String, NodeIndex>,
}

impl IndexedGraph {
    /// Create an empty indexed graph.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_index: HashMap::new(),
        }
    }

    /// Rebuild a graph from a snapshot. Fails without side effects on
    /// duplicate ids, duplicate edge keys, or dangling edges.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> LensResult<Self> {
        let mut indexed = Self::new();
        for node in snapshot.nodes {
            validate_id(&node.id, "node id")?;
            validate_attributes(&node.attributes)?;
            if indexed.node_index.contains_key(&node.id) {
                return Err(LensError::validation(format!(
                    "duplicate node id in snapshot: {}",
                    node.id
                )));
            }
            let id = node.id.clone();
            let idx = indexed.graph.add_node(node);
            indexed.node_index.insert(id, idx);
        }
        for edge in snapshot.edges {
            validate_attributes(&edge.attributes)?;
            validate_columns(&edge.columns)?;
            let source = indexed.require(&edge.source_id)?;
            let target = indexed.require(&edge.target_id)?;
            if indexed.find_between(source, target, edge.relation).is_some() {
                return Err(LensError::validation(format!(
                    "duplicate edge in snapshot: {}",
                    edge.key()
                )));
            }
            indexed.graph.add_edge(source, target, edge);
        }
        Ok(indexed)
    }

    /// Look up a node index by id.
    pub fn get_node(&self, id: &str) -> Option<NodeIndex> {
        self.node_index.get(id).copied()
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.get_node(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Look up an edge by key.
    pub fn edge(&self, key: &EdgeKey) -> Option<&Edge> {
        self.find_edge(key)
            .and_then(|idx| self.graph.edge_weight(idx))
    }

    fn require(&self, id: &str) -> LensResult<NodeIndex> {
        self.get_node(id).ok_or_else(|| LensError::unknown_node(id))
    }

    /// Create a node, or merge into the existing one with the same id:
    /// attributes are overlaid, tags are unioned, the type follows the spec,
    /// and `updated_at` is refreshed. Implicit specs never touch an existing node.
    pub fn upsert_node(&mut self, spec: NodeSpec, now: DateTime<Utc>) -> LensResult<Node> {
        let id = spec.id.clone();
        match self.stage_node(spec, now)? {
            Some(node) => Ok(self.commit_node(node)),
            None => self.node(&id).cloned().ok_or_else(|| LensError::unknown_node(id)),
        }
    }

    /// Compute the node an upsert would store, without touching the graph.
    /// `None` when the spec is implicit and the node already exists.
    pub fn stage_node(&self, spec: NodeSpec, now: DateTime<Utc>) -> LensResult<Option<Node>> {
        validate_id(&spec.id, "node id")?;
        validate_attributes(&spec.attributes)?;

        let staged = match self.node(&spec.id) {
            Some(_) if spec.implicit => return Ok(None),
            Some(existing) => {
                let mut node = existing.clone();
                node.node_type = spec.node_type;
                node.attributes.extend(spec.attributes);
                node.tags.extend(spec.tags);
                node.updated_at = now;
                node
            }
            None => Node {
                id: spec.id,
                node_type: spec.node_type,
                attributes: spec.attributes,
                tags: spec.tags,
                created_at: now,
                updated_at: now,
            },
        };
        Ok(Some(staged))
    }

    /// Store a staged node, replacing the one with the same id.
    pub fn commit_node(&mut self, node: Node) -> Node {
        match self.get_node(&node.id) {
            Some(idx) => {
                if let Some(slot) = self.graph.node_weight_mut(idx) {
                    *slot = node.clone();
                }
            }
            None => {
                let idx = self.graph.add_node(node.clone());
                self.node_index.insert(node.id.clone(), idx);
            }
        }
        node
    }

    /// Create an edge, or update the one with the same (source, target,
    /// relation). Re-ingesting a closed edge reopens it.
    pub fn upsert_edge(&mut self, spec: EdgeSpec, now: DateTime<Utc>) -> LensResult<Edge> {
        let edge = self.stage_edge(spec, now)?;
        self.commit_edge(edge)
    }

    /// Compute the edge an upsert would store, without touching the graph.
    /// Attributes are overlaid and column mappings merged per column pair.
    pub fn stage_edge(&self, spec: EdgeSpec, now: DateTime<Utc>) -> LensResult<Edge> {
        validate_id(&spec.source_id, "edge source id")?;
        validate_id(&spec.target_id, "edge target id")?;
        validate_attributes(&spec.attributes)?;
        validate_columns(&spec.columns)?;
        let source = self.require(&spec.source_id)?;
        let target = self.require(&spec.target_id)?;

        let existing = self
            .find_between(source, target, spec.relation)
            .and_then(|idx| self.graph.edge_weight(idx));
        if let Some(existing) = existing {
            let mut edge = existing.clone();
            edge.attributes.extend(spec.attributes);
            merge_columns(&mut edge.columns, spec.columns);
            if edge.valid_to.take().is_some() {
                edge.valid_from = now;
            }
            return Ok(edge);
        }

        let mut columns = Vec::new();
        merge_columns(&mut columns, spec.columns);
        Ok(Edge {
            source_id: spec.source_id,
            target_id: spec.target_id,
            relation: spec.relation,
            attributes: spec.attributes,
            columns,
            valid_from: now,
            valid_to: None,
        })
    }

    /// Store a staged edge, replacing the one with the same key. Both
    /// endpoints must exist.
    pub fn commit_edge(&mut self, edge: Edge) -> LensResult<Edge> {
        let source = self.require(&edge.source_id)?;
        let target = self.require(&edge.target_id)?;
        match self.find_between(source, target, edge.relation) {
            Some(idx) => {
                if let Some(slot) = self.graph.edge_weight_mut(idx) {
                    *slot = edge.clone();
                }
            }
            None => {
                self.graph.add_edge(source, target, edge.clone());
            }
        }
        Ok(edge)
    }

    /// Remove a node and all its edges. Returns the removed node.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let idx = self.node_index.remove(id)?;
        self.graph.remove_node(idx)
    }

    /// Remove a single edge. Returns the removed edge.
    pub fn remove_edge(&mut self, key: &EdgeKey) -> Option<Edge> {
        let idx = self.find_edge(key)?;
        self.graph.remove_edge(idx)
    }

    /// Close an edge's validity window at `at` without deleting it.
    pub fn invalidate_edge(&mut self, key: &EdgeKey, at: DateTime<Utc>) -> LensResult<Edge> {
        let edge = self.stage_invalidation(key, at)?;
        self.commit_edge(edge)
    }

    /// The edge as it would look once closed at `at`.
    pub fn stage_invalidation(&self, key: &EdgeKey, at: DateTime<Utc>) -> LensResult<Edge> {
        let mut edge = self
            .edge(key)
            .cloned()
            .ok_or_else(|| LensError::unknown_node(key.to_string()))?;
        if at < edge.valid_from {
            return Err(LensError::validation(format!(
                "cannot invalidate {key} before it became valid"
            )));
        }
        edge.valid_to = Some(at);
        Ok(edge)
    }

    /// Find the edge index for a key.
    pub fn find_edge(&self, key: &EdgeKey) -> Option<EdgeIndex> {
        let source = self.get_node(&key.source_id)?;
        let target = self.get_node(&key.target_id)?;
        self.find_between(source, target, key.relation)
    }

    fn find_between(&self, source: NodeIndex, target: NodeIndex, relation: Relation) -> Option<EdgeIndex> {
        self.graph
            .edges_directed(source, petgraph::Direction::Outgoing)
            .find(|e| e.target() == target && e.weight().relation == relation)
            .map(|e| e.id())
    }

    /// Edges adjacent to `idx` in the given direction, paired with the node at
    /// the other end, in insertion order.
    pub fn adjacent(&self, idx: NodeIndex, direction: petgraph::Direction) -> Vec<(NodeIndex, &Edge)> {
        // petgraph yields the most recently added edge first.
        let mut adjacent: Vec<(NodeIndex, &Edge)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    petgraph::Direction::Outgoing => e.target(),
                    petgraph::Direction::Incoming => e.source(),
                };
                (other, e.weight())
            })
            .collect();
        adjacent.reverse();
        adjacent
    }

    /// Copy out every node and edge, ordered by id and key.
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut nodes: Vec<Node> = self.graph.node_weights().cloned().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        let mut edges: Vec<Edge> = self.graph.edge_weights().cloned().collect();
        edges.sort_by_key(|e| e.key());
        GraphSnapshot { nodes, edges }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for IndexedGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject empty or whitespace-only identifiers.
pub fn validate_id(id: &str, what: &str) -> LensResult<()> {
    if id.trim().is_empty() {
        return Err(LensError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Reject malformed column mappings.
pub fn validate_columns(columns: &[ColumnMapping]) -> LensResult<()> {
    for mapping in columns {
        mapping.check().map_err(LensError::validation)?;
    }
    Ok(())
}

/// Reject empty keys and non-finite numbers.
pub fn validate_attributes(attributes: &Attributes) -> LensResult<()> {
    for (key, value) in attributes {
        if key.trim().is_empty() {
            return Err(LensError::validation("attribute key must not be empty"));
        }
        if !value.is_finite() {
            return Err(LensError::validation(format!(
                "attribute {key} must be a finite number"
            )));
        }
    }
    Ok(())
}
