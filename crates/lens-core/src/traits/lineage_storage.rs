use crate::errors::LensResult;
use crate::models::{Edge, EdgeKey, Node};

/// Persistence backend for the lineage graph.
///
/// The in-memory graph is authoritative; a backend only has to store what it
/// is given and hand it back on restart.
pub trait ILineageStorage: Send + Sync {
    // --- Nodes ---
    fn save_node(&self, node: &Node) -> LensResult<()>;
    /// Delete a node and every edge touching it. Absent ids are not an error.
    fn delete_node(&self, id: &str) -> LensResult<()>;
    fn load_nodes(&self) -> LensResult<Vec<Node>>;

    // --- Edges ---
    fn save_edge(&self, edge: &Edge) -> LensResult<()>;
    fn delete_edge(&self, key: &EdgeKey) -> LensResult<()>;
    fn load_edges(&self) -> LensResult<Vec<Edge>>;

    // --- Statistics ---
    fn node_count(&self) -> LensResult<usize>;
    fn edge_count(&self) -> LensResult<usize>;
}
