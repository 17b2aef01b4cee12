//! The one SQLite connection a `StorageEngine` owns.
//!
//! `LineageEngine` already orders every mutation under its graph write lock,
//! so a process never has two lineage writers. Reads and writes share one
//! connection behind a mutex.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rusqlite::Connection;

use lens_core::config::defaults;
use lens_core::errors::{LensError, LensResult};

use crate::to_storage_err;

pub(crate) struct LineageDb {
    conn: Mutex<Connection>,
}

impl LineageDb {
    /// Open or create a database file. File databases journal in WAL mode
    /// so an outside reader never blocks the engine.
    pub fn open_file(path: &Path, busy_timeout_ms: u32) -> LensResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        configure(&conn, busy_timeout_ms)?;
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(|e| to_storage_err(e.to_string()))?;
        if !mode.eq_ignore_ascii_case("wal") {
            tracing::warn!(path = %path.display(), mode = %mode, "database refused WAL journaling");
        }
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| to_storage_err(e.to_string()))?;
        Ok(Self::wrap(conn))
    }

    /// Private in-memory database. Journaling stays `memory`.
    pub fn open_memory() -> LensResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        configure(&conn, defaults::DEFAULT_BUSY_TIMEOUT_MS)?;
        Ok(Self::wrap(conn))
    }

    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn with<F, T>(&self, f: F) -> LensResult<T>
    where
        F: FnOnce(&Connection) -> LensResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| LensError::Concurrency(format!("lineage database lock poisoned: {e}")))?;
        f(&guard)
    }
}

/// Settings every lineage connection needs regardless of where it lives.
fn configure(conn: &Connection, busy_timeout_ms: u32) -> LensResult<()> {
    conn.busy_timeout(Duration::from_millis(busy_timeout_ms.into()))
        .map_err(|e| to_storage_err(e.to_string()))?;

    // Node deletes rely on ON DELETE CASCADE to drop incident edges.
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let enforced: bool = conn
        .pragma_query_value(None, "foreign_keys", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    if !enforced {
        return Err(to_storage_err(
            "this SQLite build cannot enforce foreign keys".to_string(),
        ));
    }
    Ok(())
}

/// Current journal mode, lowercased (`wal`, `memory`, `delete`, ...).
pub(crate) fn journal_mode(conn: &Connection) -> LensResult<String> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.to_ascii_lowercase())
}
