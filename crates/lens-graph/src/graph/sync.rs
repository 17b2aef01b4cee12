//! Sync between the in-memory graph and an `ILineageStorage` backend.
//! Rebuild the graph from storage on startup, persist mutations to storage.

use lens_core::errors::LensResult;
use lens_core::models::{Edge, EdgeKey, GraphSnapshot, Node};
use lens_core::traits::ILineageStorage;

use super::stable_graph::IndexedGraph;

/// Load every node and edge from storage into a fresh graph.
pub fn rebuild_from_storage(storage: &dyn ILineageStorage) -> LensResult<IndexedGraph> {
    let snapshot = GraphSnapshot {
        nodes: storage.load_nodes()?,
        edges: storage.load_edges()?,
    };
    IndexedGraph::from_snapshot(snapshot)
}

/// Persist a single node.
pub fn persist_node(storage: &dyn ILineageStorage, node: &Node) -> LensResult<()> {
    storage.save_node(node)
}

/// Persist a single edge.
pub fn persist_edge(storage: &dyn ILineageStorage, edge: &Edge) -> LensResult<()> {
    storage.save_edge(edge)
}

/// Remove a node (and, through the backend, its edges) from storage.
pub fn remove_persisted_node(storage: &dyn ILineageStorage, id: &str) -> LensResult<()> {
    storage.delete_node(id)
}

/// Remove an edge from storage.
pub fn remove_persisted_edge(storage: &dyn ILineageStorage, key: &EdgeKey) -> LensResult<()> {
    storage.delete_edge(key)
}

/// Write a whole snapshot. Nodes go first so backends enforcing foreign keys
/// accept the edges.
pub fn persist_snapshot(storage: &dyn ILineageStorage, snapshot: &GraphSnapshot) -> LensResult<()> {
    for node in &snapshot.nodes {
        storage.save_node(node)?;
    }
    for edge in &snapshot.edges {
        storage.save_edge(edge)?;
    }
    Ok(())
}
