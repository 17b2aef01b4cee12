//! # lens-storage
//!
//! SQLite persistence for the lineage graph. Implements `ILineageStorage`
//! over one mutex-guarded connection, with the schema managed by
//! `PRAGMA user_version` migrations.

mod connection;
pub mod engine;
pub mod migrations;
pub mod queries;

pub use engine::StorageEngine;

use lens_core::errors::{LensError, StorageError};

/// Wrap a SQLite failure message as a `LensError`.
pub(crate) fn to_storage_err(message: String) -> LensError {
    LensError::Storage(StorageError::SqliteError { message })
}

/// A row that could not be decoded back into the model.
pub(crate) fn corrupt_row(details: impl Into<String>) -> LensError {
    LensError::Storage(StorageError::CorruptRow {
        details: details.into(),
    })
}
