//! # lens-core
//!
//! Foundation crate for the LENS lineage engine.
//! Defines the lineage model, error taxonomy, configuration, and the
//! boundary traits implemented by source adapters and persistence backends.

pub mod config;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::LensConfig;
pub use errors::{LensError, LensResult};
pub use models::{
    AttributeValue, Attributes, ColumnMapping, Direction, Edge, EdgeKey, EdgeSpec, GraphSnapshot, Node, NodeSpec,
    NodeType, RecordSpec, Relation,
};
