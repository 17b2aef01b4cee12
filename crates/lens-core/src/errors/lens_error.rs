use super::{SchemaError, StorageError};

/// Result alias used across every LENS crate.
pub type LensResult<T> = Result<T, LensError>;

/// Top-level error for the lineage engine.
///
/// Graph and traversal operations fail atomically: when one of these is
/// returned, the graph is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum LensError {
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    #[error("unknown node: {id}")]
    UnknownNode { id: String },

    #[error("unknown asset: {id}")]
    UnknownAsset { id: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("concurrency error: {0}")]
    Concurrency(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LensError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    pub fn unknown_asset(id: impl Into<String>) -> Self {
        Self::UnknownAsset { id: id.into() }
    }
}

impl From<serde_json::Error> for LensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
