//! Schema migrations using PRAGMA user_version.

pub mod v001_lineage_tables;
pub mod v002_column_lineage;

use rusqlite::Connection;

use lens_core::errors::{LensResult, StorageError};

use crate::to_storage_err;

/// Highest schema version this build knows how to create.
pub const LATEST_VERSION: u32 = 2;

const MIGRATIONS: &[(&str, u32)] = &[
    (v001_lineage_tables::MIGRATION_SQL, 1),
    (v002_column_lineage::MIGRATION_SQL, 2),
];

/// Run all pending migrations. Returns how many were applied.
pub fn run_migrations(conn: &Connection) -> LensResult<usize> {
    let current = current_version(conn)?;
    if current > LATEST_VERSION {
        return Err(StorageError::MigrationFailed {
            version: current,
            reason: format!("database schema is newer than this build (max {LATEST_VERSION})"),
        }
        .into());
    }

    let mut applied = 0;
    for (sql, version) in MIGRATIONS {
        if current >= *version {
            continue;
        }
        conn.execute_batch(sql).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })?;
        tracing::info!(version = version, "applied migration");
        applied += 1;
    }
    Ok(applied)
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> LensResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}
