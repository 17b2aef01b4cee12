//! Ingestion Normalizer: turns adapter output into canonical node and edge
//! specs. Vendor knowledge stays in the adapters.

pub mod canonical;
pub mod validate;

use std::collections::HashMap;

use tracing::{debug, warn};

use lens_core::config::IngestionConfig;
use lens_core::errors::{LensError, SchemaError};
use lens_core::models::{merge_columns, EdgeKey, EdgeSpec, NodeSpec, RecordSpec};
use lens_core::traits::{RawEdge, RawNode, SourceAdapter};

/// Specs accepted from a batch plus one error per rejected record.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    /// Explicit node specs, then implicit endpoint specs, then edge specs.
    pub specs: Vec<RecordSpec>,
    pub errors: Vec<SchemaError>,
    pub records_seen: usize,
}

impl NormalizeOutcome {
    pub fn records_rejected(&self) -> usize {
        self.errors.len()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Result of ingesting a batch into the graph.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub records_seen: usize,
    pub nodes_upserted: usize,
    pub edges_upserted: usize,
    /// Schema errors for skipped records and graph errors for rejected specs.
    pub errors: Vec<LensError>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: IngestionConfig,
}

impl Normalizer {
    pub fn new(config: IngestionConfig) -> Self {
        Self { config }
    }

    /// Normalize a batch. A malformed record is skipped whole; the rest of
    /// the batch is unaffected. Repeated ids and edge keys are merged.
    pub fn normalize<A: SourceAdapter>(&self, records: &[A::Record], adapter: &A) -> NormalizeOutcome {
        let mut batch = Batch::default();
        let mut errors = Vec::new();

        for (index, record) in records.iter().enumerate() {
            match self.normalize_record(adapter, record) {
                Ok((nodes, implicit, edges)) => batch.absorb(nodes, implicit, edges),
                Err(reason) => {
                    let err = SchemaError::new(index, adapter.name(), reason);
                    warn!(adapter = adapter.name(), record = index, error = %err, "skipping malformed record");
                    errors.push(err);
                }
            }
        }

        let specs = batch.into_specs();
        debug!(
            adapter = adapter.name(),
            records = records.len(),
            specs = specs.len(),
            rejected = errors.len(),
            "normalized batch"
        );
        NormalizeOutcome {
            specs,
            errors,
            records_seen: records.len(),
        }
    }

    #[allow(clippy::type_complexity)]
    fn normalize_record<A: SourceAdapter>(
        &self,
        adapter: &A,
        record: &A::Record,
    ) -> Result<(Vec<NodeSpec>, Vec<NodeSpec>, Vec<EdgeSpec>), String> {
        let nodes = adapter
            .extract_nodes(record)
            .iter()
            .map(|raw| self.node_spec(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let mut implicit = Vec::new();
        let mut edges = Vec::new();
        for raw in adapter.extract_edges(record) {
            let (edge, endpoints) = self.edge_spec(&raw)?;
            implicit.extend(endpoints);
            edges.push(edge);
        }
        Ok((nodes, implicit, edges))
    }

    fn node_spec(&self, raw: &RawNode) -> Result<NodeSpec, String> {
        Ok(NodeSpec {
            id: canonical::canonical_id(&raw.asset, &self.config)?,
            node_type: validate::node_type(raw.node_type.as_deref())?,
            attributes: validate::attributes(&raw.attributes)?,
            tags: validate::tags(&raw.tags),
            implicit: false,
        })
    }

    /// The edge spec plus implicit specs for endpoints whose type is known.
    fn edge_spec(&self, raw: &RawEdge) -> Result<(EdgeSpec, Vec<NodeSpec>), String> {
        let source_id = canonical::canonical_id(&raw.source, &self.config)
            .map_err(|reason| format!("edge source: {reason}"))?;
        let target_id = canonical::canonical_id(&raw.target, &self.config)
            .map_err(|reason| format!("edge target: {reason}"))?;

        let mut endpoints = Vec::new();
        for (id, node_type) in [(&source_id, &raw.source_type), (&target_id, &raw.target_type)] {
            if let Some(node_type) = node_type.as_deref() {
                endpoints.push(NodeSpec::new(id.clone(), validate::node_type(Some(node_type))?).implicit());
            }
        }

        let edge = EdgeSpec {
            source_id,
            target_id,
            relation: validate::relation(raw.relation.as_deref())?,
            attributes: validate::attributes(&raw.attributes)?,
            columns: validate::columns(&raw.columns)?,
        };
        Ok((edge, endpoints))
    }
}

/// Accumulates accepted specs, merging duplicates in first-seen order.
#[derive(Default)]
struct Batch {
    nodes: Vec<NodeSpec>,
    node_at: HashMap<String, usize>,
    implicit: Vec<NodeSpec>,
    implicit_at: HashMap<String, usize>,
    edges: Vec<EdgeSpec>,
    edge_at: HashMap<EdgeKey, usize>,
}

impl Batch {
    fn absorb(&mut self, nodes: Vec<NodeSpec>, implicit: Vec<NodeSpec>, edges: Vec<EdgeSpec>) {
        for spec in nodes {
            match self.node_at.get(&spec.id) {
                Some(&at) => {
                    let existing = &mut self.nodes[at];
                    existing.node_type = spec.node_type;
                    existing.attributes.extend(spec.attributes);
                    existing.tags.extend(spec.tags);
                }
                None => {
                    self.node_at.insert(spec.id.clone(), self.nodes.len());
                    self.nodes.push(spec);
                }
            }
        }
        for spec in implicit {
            if !self.implicit_at.contains_key(&spec.id) {
                self.implicit_at.insert(spec.id.clone(), self.implicit.len());
                self.implicit.push(spec);
            }
        }
        for spec in edges {
            let key = EdgeKey::new(spec.source_id.clone(), spec.target_id.clone(), spec.relation);
            match self.edge_at.get(&key) {
                Some(&at) => {
                    let existing = &mut self.edges[at];
                    existing.attributes.extend(spec.attributes);
                    merge_columns(&mut existing.columns, spec.columns);
                }
                None => {
                    self.edge_at.insert(key, self.edges.len());
                    self.edges.push(spec);
                }
            }
        }
    }

    fn into_specs(self) -> Vec<RecordSpec> {
        let Batch {
            nodes,
            node_at,
            implicit,
            edges,
            ..
        } = self;
        let implicit = implicit
            .into_iter()
            .filter(|spec| !node_at.contains_key(&spec.id));
        nodes
            .into_iter()
            .chain(implicit)
            .map(RecordSpec::Node)
            .chain(edges.into_iter().map(RecordSpec::Edge))
            .collect()
    }
}
