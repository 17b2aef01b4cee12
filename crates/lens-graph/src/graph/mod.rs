//! Graph Store: the shared lineage graph behind a single-writer /
//! multi-reader lock.

pub mod query;
pub mod stable_graph;
pub mod sync;

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use lens_core::errors::{LensError, LensResult};
use lens_core::models::{
    ColumnMapping, Direction, Edge, EdgeKey, EdgeSpec, GraphSnapshot, Node, NodeSpec, NodeType,
    RecordSpec,
};
use lens_core::traits::ILineageStorage;

pub use self::query::GraphStats;
use self::stable_graph::IndexedGraph;

/// Outcome of applying a batch of normalized specs.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Specs that were rejected, with their position in the batch.
    pub rejected: Vec<(usize, LensError)>,
}

/// Thread-safe handle to one lineage graph.
///
/// Cloning the handle shares the graph. Mutations take the write lock for
/// their whole duration, so readers never observe a partial mutation.
#[derive(Clone, Default)]
pub struct GraphStore {
    inner: Arc<RwLock<IndexedGraph>>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> LensResult<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(IndexedGraph::from_snapshot(snapshot)?)),
        })
    }

    /// Run `f` against a consistent read-only view of the graph.
    pub fn read<T>(&self, f: impl FnOnce(&IndexedGraph) -> T) -> LensResult<T> {
        let guard = self
            .inner
            .read()
            .map_err(|e| LensError::Concurrency(e.to_string()))?;
        Ok(f(&guard))
    }

    /// Run `f` with exclusive access to the graph.
    pub fn write<T>(&self, f: impl FnOnce(&mut IndexedGraph) -> LensResult<T>) -> LensResult<T> {
        let mut guard = self
            .inner
            .write()
            .map_err(|e| LensError::Concurrency(e.to_string()))?;
        f(&mut guard)
    }

    // --- Mutations ---

    /// Create or merge a node. Fails only on a malformed id or attributes.
    pub fn upsert_node(&self, spec: NodeSpec) -> LensResult<Node> {
        self.write(|g| g.upsert_node(spec, Utc::now()))
    }

    /// Create or update an edge. Fails with `UnknownNode` if an endpoint is absent.
    pub fn upsert_edge(&self, spec: EdgeSpec) -> LensResult<Edge> {
        self.write(|g| g.upsert_edge(spec, Utc::now()))
    }

    /// Remove a node and its incident edges. Idempotent; returns whether a
    /// node was removed.
    pub fn delete_node(&self, id: &str) -> LensResult<bool> {
        self.write(|g| Ok(g.remove_node(id).is_some()))
    }

    /// Remove a single edge. Returns whether an edge was removed.
    pub fn remove_edge(&self, key: &EdgeKey) -> LensResult<bool> {
        self.write(|g| Ok(g.remove_edge(key).is_some()))
    }

    /// Close an edge's validity window at `at` (default: now).
    pub fn invalidate_edge(&self, key: &EdgeKey, at: Option<DateTime<Utc>>) -> LensResult<Edge> {
        self.write(|g| g.invalidate_edge(key, at.unwrap_or_else(Utc::now)))
    }

    /// Apply normalized specs under a single write lock.
    pub fn apply_batch(&self, specs: Vec<RecordSpec>) -> LensResult<BatchOutcome> {
        self.write(|g| Ok(apply_specs(g, specs, Utc::now(), None)))
    }

    /// Replace the whole graph with a snapshot. The current graph is kept if
    /// the snapshot is invalid.
    pub fn restore(&self, snapshot: GraphSnapshot) -> LensResult<()> {
        let rebuilt = IndexedGraph::from_snapshot(snapshot)?;
        self.write(|g| {
            *g = rebuilt;
            Ok(())
        })
    }

    // --- Reads ---

    pub fn get_node(&self, id: &str) -> LensResult<Option<Node>> {
        self.read(|g| g.node(id).cloned())
    }

    pub fn get_edge(&self, key: &EdgeKey) -> LensResult<Option<Edge>> {
        self.read(|g| g.edge(key).cloned())
    }

    /// Column mappings on one edge. `UnknownNode` if the edge does not exist.
    pub fn column_lineage(&self, key: &EdgeKey) -> LensResult<Vec<ColumnMapping>> {
        self.read(|g| {
            g.edge(key)
                .map(|e| e.columns.clone())
                .ok_or_else(|| LensError::unknown_node(key.to_string()))
        })?
    }

    /// Edges adjacent to `id`: incoming for upstream, outgoing for
    /// downstream, incoming then outgoing for both. Unknown ids have no
    /// neighbours.
    pub fn neighbors(&self, id: &str, direction: Direction) -> LensResult<Vec<Edge>> {
        self.read(|g| {
            let Some(idx) = g.get_node(id) else {
                return Vec::new();
            };
            let incoming = || g.adjacent(idx, petgraph::Direction::Incoming);
            let outgoing = || g.adjacent(idx, petgraph::Direction::Outgoing);
            let edges: Vec<&Edge> = match direction {
                Direction::Upstream => incoming().into_iter().map(|(_, e)| e).collect(),
                Direction::Downstream => outgoing().into_iter().map(|(_, e)| e).collect(),
                Direction::Both => incoming()
                    .into_iter()
                    .chain(outgoing().into_iter().filter(|(other, _)| *other != idx))
                    .map(|(_, e)| e)
                    .collect(),
            };
            edges.into_iter().cloned().collect()
        })
    }

    pub fn find_nodes_by_type(&self, node_type: NodeType, limit: usize, offset: usize) -> LensResult<Vec<Node>> {
        self.read(|g| query::find_by_type(g, node_type, limit, offset))
    }

    pub fn search_nodes(&self, term: &str, node_types: Option<&[NodeType]>, limit: usize) -> LensResult<Vec<Node>> {
        self.read(|g| query::search(g, term, node_types, limit))
    }

    pub fn stats(&self) -> LensResult<GraphStats> {
        self.read(query::stats)
    }

    pub fn snapshot(&self) -> LensResult<GraphSnapshot> {
        self.read(IndexedGraph::snapshot)
    }

    pub fn node_count(&self) -> LensResult<usize> {
        self.read(IndexedGraph::node_count)
    }

    pub fn edge_count(&self) -> LensResult<usize> {
        self.read(IndexedGraph::edge_count)
    }
}

/// Apply specs to a graph, nodes before edges so a batch may reference its
/// own nodes. Individual failures are collected, never fatal.
///
/// With a storage backend, each staged node or edge is persisted before it is
/// committed; a spec whose write fails is rejected and leaves the graph as it
/// was. Implicit endpoint specs for nodes that already exist change nothing
/// and are not reported as upserted.
pub fn apply_specs(
    graph: &mut IndexedGraph,
    specs: Vec<RecordSpec>,
    now: DateTime<Utc>,
    storage: Option<&dyn ILineageStorage>,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    let (node_specs, edge_specs): (Vec<_>, Vec<_>) = specs
        .into_iter()
        .enumerate()
        .partition(|(_, spec)| matches!(spec, RecordSpec::Node(_)));

    for (position, spec) in node_specs.into_iter().chain(edge_specs) {
        let applied = match spec {
            RecordSpec::Node(spec) => apply_node(graph, spec, now, storage)
                .map(|node| outcome.nodes.extend(node)),
            RecordSpec::Edge(spec) => apply_edge(graph, spec, now, storage)
                .map(|edge| outcome.edges.push(edge)),
        };
        if let Err(err) = applied {
            outcome.rejected.push((position, err));
        }
    }
    outcome
}

fn apply_node(
    graph: &mut IndexedGraph,
    spec: NodeSpec,
    now: DateTime<Utc>,
    storage: Option<&dyn ILineageStorage>,
) -> LensResult<Option<Node>> {
    let Some(node) = graph.stage_node(spec, now)? else {
        return Ok(None);
    };
    if let Some(storage) = storage {
        sync::persist_node(storage, &node)?;
    }
    Ok(Some(graph.commit_node(node)))
}

fn apply_edge(
    graph: &mut IndexedGraph,
    spec: EdgeSpec,
    now: DateTime<Utc>,
    storage: Option<&dyn ILineageStorage>,
) -> LensResult<Edge> {
    let edge = graph.stage_edge(spec, now)?;
    if let Some(storage) = storage {
        sync::persist_edge(storage, &edge)?;
    }
    graph.commit_edge(edge)
}
