mod adapter;
mod lineage_storage;

pub use adapter::{AssetRef, RawColumnMapping, RawEdge, RawNode, SourceAdapter};
pub use lineage_storage::ILineageStorage;
