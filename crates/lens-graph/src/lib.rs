//! # lens-graph
//!
//! The lineage engine. Keeps the graph in memory (`petgraph`) behind a
//! single-writer / multi-reader lock, normalizes adapter output into it,
//! answers ancestry and impact traversals, and classifies impact for the
//! narrative layer.

pub mod engine;
pub mod graph;
pub mod impact;
pub mod ingestion;
pub mod traversal;

pub use engine::LineageEngine;
pub use graph::GraphStore;
pub use impact::{Criticality, ImpactClassifier, ImpactSummary, NodeClassification, RiskLevel};
pub use ingestion::{IngestReport, NormalizeOutcome, Normalizer};
pub use traversal::{TraversalEngine, TraversalNode, TraversalQuery, TraversalResult};
