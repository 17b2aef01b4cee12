//! LineageEngine: owns one graph instance and wires the normalizer,
//! traversal engine, classifier, and optional persistence around it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use lens_core::config::{defaults, LensConfig};
use lens_core::errors::{LensError, LensResult};
use lens_core::models::{
    ColumnMapping, Direction, Edge, EdgeKey, EdgeSpec, GraphSnapshot, Node, NodeSpec, NodeType,
};
use lens_core::traits::{ILineageStorage, SourceAdapter};

use crate::graph::{self, sync, GraphStats, GraphStore};
use crate::impact::{ImpactClassifier, ImpactSummary};
use crate::ingestion::{IngestReport, Normalizer};
use crate::traversal::{TraversalEngine, TraversalQuery, TraversalResult};

/// The lineage core behind the service layer.
///
/// Mutations persist to the attached storage, when there is one, while the
/// graph write lock is still held, so storage sees writes in graph order.
/// A change reaches the graph only after storage accepted it.
#[derive(Clone, Default)]
pub struct LineageEngine {
    store: GraphStore,
    normalizer: Normalizer,
    traversal: TraversalEngine,
    classifier: ImpactClassifier,
    storage: Option<Arc<dyn ILineageStorage>>,
}

impl LineageEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &LensConfig) -> Self {
        Self {
            store: GraphStore::new(),
            normalizer: Normalizer::new(config.ingestion.clone()),
            traversal: TraversalEngine::new(config.traversal.clone()),
            classifier: ImpactClassifier::new(config.classifier.clone()),
            storage: None,
        }
    }

    /// Attach a persistence backend. Call [`Self::hydrate`] to load what it
    /// already holds.
    pub fn with_storage(mut self, storage: Arc<dyn ILineageStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn classifier(&self) -> &ImpactClassifier {
        &self.classifier
    }

    /// Replace the in-memory graph with the contents of storage.
    /// Returns the number of nodes loaded.
    pub fn hydrate(&self) -> LensResult<usize> {
        let Some(storage) = &self.storage else {
            return Ok(0);
        };
        let rebuilt = sync::rebuild_from_storage(storage.as_ref())?;
        let (nodes, edges) = (rebuilt.node_count(), rebuilt.edge_count());
        self.store.write(|g| {
            *g = rebuilt;
            Ok(())
        })?;
        info!(nodes, edges, "hydrated lineage graph from storage");
        Ok(nodes)
    }

    /// Write the whole in-memory graph to storage.
    pub fn flush(&self) -> LensResult<()> {
        let Some(storage) = &self.storage else {
            return Ok(());
        };
        let snapshot = self.store.snapshot()?;
        sync::persist_snapshot(storage.as_ref(), &snapshot)?;
        debug!(nodes = snapshot.nodes.len(), edges = snapshot.edges.len(), "flushed lineage graph");
        Ok(())
    }

    // --- Graph Store ---
    //
    // Each mutation stages its result under the write lock, persists it, and
    // only then commits to the graph, so a failed write leaves the graph as
    // it was.

    pub fn upsert_node(&self, spec: NodeSpec) -> LensResult<Node> {
        self.store.write(|g| {
            let id = spec.id.clone();
            let Some(node) = g.stage_node(spec, Utc::now())? else {
                return g.node(&id).cloned().ok_or_else(|| LensError::unknown_node(id));
            };
            self.persist(|storage| sync::persist_node(storage, &node))?;
            Ok(g.commit_node(node))
        })
    }

    pub fn upsert_edge(&self, spec: EdgeSpec) -> LensResult<Edge> {
        self.store.write(|g| {
            let edge = g.stage_edge(spec, Utc::now())?;
            self.persist(|storage| sync::persist_edge(storage, &edge))?;
            g.commit_edge(edge)
        })
    }

    /// Remove a node and its incident edges. No error if absent.
    pub fn delete_node(&self, id: &str) -> LensResult<bool> {
        self.store.write(|g| {
            if g.get_node(id).is_none() {
                return Ok(false);
            }
            self.persist(|storage| sync::remove_persisted_node(storage, id))?;
            Ok(g.remove_node(id).is_some())
        })
    }

    pub fn remove_edge(&self, key: &EdgeKey) -> LensResult<bool> {
        self.store.write(|g| {
            if g.find_edge(key).is_none() {
                return Ok(false);
            }
            self.persist(|storage| sync::remove_persisted_edge(storage, key))?;
            Ok(g.remove_edge(key).is_some())
        })
    }

    pub fn invalidate_edge(&self, key: &EdgeKey, at: Option<DateTime<Utc>>) -> LensResult<Edge> {
        self.store.write(|g| {
            let edge = g.stage_invalidation(key, at.unwrap_or_else(Utc::now))?;
            self.persist(|storage| sync::persist_edge(storage, &edge))?;
            g.commit_edge(edge)
        })
    }

    /// Column mappings recorded on one edge.
    pub fn column_lineage(&self, key: &EdgeKey) -> LensResult<Vec<ColumnMapping>> {
        self.store.column_lineage(key)
    }

    fn persist(&self, write: impl FnOnce(&dyn ILineageStorage) -> LensResult<()>) -> LensResult<()> {
        match &self.storage {
            Some(storage) => write(storage.as_ref()),
            None => Ok(()),
        }
    }

    pub fn get_node(&self, id: &str) -> LensResult<Option<Node>> {
        self.store.get_node(id)
    }

    pub fn neighbors(&self, id: &str, direction: Direction) -> LensResult<Vec<Edge>> {
        self.store.neighbors(id, direction)
    }

    // --- Ingestion ---

    /// Normalize a batch and apply it under one write lock. Malformed
    /// records, rejected specs, and failed storage writes are reported in
    /// the returned report, never fatal. Only a poisoned lock fails the call.
    pub fn ingest<A: SourceAdapter>(&self, records: &[A::Record], adapter: &A) -> LensResult<IngestReport> {
        let outcome = self.normalizer.normalize(records, adapter);
        let records_seen = outcome.records_seen;
        let mut errors: Vec<LensError> = outcome.errors.into_iter().map(LensError::from).collect();

        let storage = self.storage.as_deref();
        let applied = self
            .store
            .write(|g| Ok(graph::apply_specs(g, outcome.specs, Utc::now(), storage)))?;

        for (position, err) in applied.rejected {
            warn!(adapter = adapter.name(), spec = position, error = %err, "rejected spec");
            errors.push(err);
        }
        let report = IngestReport {
            records_seen,
            nodes_upserted: applied.nodes.len(),
            edges_upserted: applied.edges.len(),
            errors,
        };
        info!(
            adapter = adapter.name(),
            records = report.records_seen,
            nodes = report.nodes_upserted,
            edges = report.edges_upserted,
            errors = report.errors.len(),
            "ingested batch"
        );
        Ok(report)
    }

    // --- Traversal ---

    pub fn ancestors(&self, asset_id: &str, query: &TraversalQuery) -> LensResult<TraversalResult> {
        self.store.read(|g| self.traversal.ancestors(g, asset_id, query))?
    }

    pub fn descendants(&self, asset_id: &str, query: &TraversalQuery) -> LensResult<TraversalResult> {
        self.store.read(|g| self.traversal.descendants(g, asset_id, query))?
    }

    pub fn lineage(&self, asset_id: &str, query: &TraversalQuery) -> LensResult<TraversalResult> {
        self.store.read(|g| self.traversal.lineage(g, asset_id, query))?
    }

    // --- Impact ---

    pub fn classify(&self, result: &TraversalResult) -> ImpactSummary {
        self.classifier.classify(result)
    }

    /// Downstream impact of a change to `asset_id`, classified.
    pub fn impact(&self, asset_id: &str, query: &TraversalQuery) -> LensResult<ImpactSummary> {
        let result = self.descendants(asset_id, query)?;
        Ok(self.classifier.classify(&result))
    }

    // --- Lookup ---

    /// Nodes of one type, ordered by id. `limit` defaults to 100.
    pub fn find_nodes_by_type(&self, node_type: NodeType, limit: Option<usize>, offset: usize) -> LensResult<Vec<Node>> {
        self.store
            .find_nodes_by_type(node_type, limit.unwrap_or(defaults::DEFAULT_QUERY_LIMIT), offset)
    }

    pub fn search_nodes(&self, term: &str, node_types: Option<&[NodeType]>, limit: Option<usize>) -> LensResult<Vec<Node>> {
        self.store
            .search_nodes(term, node_types, limit.unwrap_or(defaults::DEFAULT_QUERY_LIMIT))
    }

    pub fn stats(&self) -> LensResult<GraphStats> {
        self.store.stats()
    }

    pub fn snapshot(&self) -> LensResult<GraphSnapshot> {
        self.store.snapshot()
    }

    /// Replace the in-memory graph. Storage is not touched; call
    /// [`Self::flush`] to persist the restored graph.
    pub fn restore(&self, snapshot: GraphSnapshot) -> LensResult<()> {
        self.store.restore(snapshot)
    }
}
