//! Lineage model: nodes, typed edges, ingestion specs, and snapshots.

mod attributes;
mod column;
mod direction;
mod edge;
mod node;
mod snapshot;
mod spec;

pub use attributes::{AttributeValue, Attributes};
pub use column::{merge_columns, ColumnMapping, TransformationType};
pub use direction::Direction;
pub use edge::{Edge, EdgeKey, Relation};
pub use node::{Node, NodeType};
pub use snapshot::GraphSnapshot;
pub use spec::{EdgeSpec, NodeSpec, RecordSpec};
