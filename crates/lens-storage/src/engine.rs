//! StorageEngine: owns the lineage database, runs migrations on open,
//! implements `ILineageStorage`.

use std::path::{Path, PathBuf};

use lens_core::config::{defaults, StorageConfig};
use lens_core::errors::LensResult;
use lens_core::models::{Edge, EdgeKey, Node};
use lens_core::traits::ILineageStorage;

use crate::connection::{self, LineageDb};
use crate::migrations;
use crate::queries::{edge_ops, node_ops};

/// SQLite-backed lineage storage.
pub struct StorageEngine {
    db: LineageDb,
    db_path: Option<PathBuf>,
}

impl StorageEngine {
    /// Open (or create) a database file with the default busy timeout.
    pub fn open(path: &Path) -> LensResult<Self> {
        Self::open_with_timeout(path, defaults::DEFAULT_BUSY_TIMEOUT_MS)
    }

    /// Open the database named by a `[storage]` config section.
    pub fn from_config(config: &StorageConfig) -> LensResult<Self> {
        Self::open_with_timeout(Path::new(&config.db_path), config.busy_timeout_ms)
    }

    fn open_with_timeout(path: &Path, busy_timeout_ms: u32) -> LensResult<Self> {
        let engine = Self {
            db: LineageDb::open_file(path, busy_timeout_ms)?,
            db_path: Some(path.to_path_buf()),
        };
        engine.initialize()?;
        tracing::info!(path = %path.display(), "opened lineage database");
        Ok(engine)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> LensResult<Self> {
        let engine = Self {
            db: LineageDb::open_memory()?,
            db_path: None,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> LensResult<()> {
        self.db.with(|conn| {
            migrations::run_migrations(conn)?;
            Ok(())
        })
    }

    /// Database file path, `None` for in-memory databases.
    pub fn db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn schema_version(&self) -> LensResult<u32> {
        self.db.with(migrations::current_version)
    }

    pub fn is_wal_mode(&self) -> LensResult<bool> {
        Ok(self.db.with(connection::journal_mode)? == "wal")
    }

    pub fn get_node(&self, id: &str) -> LensResult<Option<Node>> {
        self.db.with(|conn| node_ops::get_node(conn, id))
    }

    pub fn get_edge(&self, key: &EdgeKey) -> LensResult<Option<Edge>> {
        self.db.with(|conn| edge_ops::get_edge(conn, key))
    }

    /// Stored edges with `node_id` as either endpoint.
    pub fn edges_for_node(&self, node_id: &str) -> LensResult<Vec<Edge>> {
        self.db.with(|conn| edge_ops::edges_for_node(conn, node_id))
    }
}

impl ILineageStorage for StorageEngine {
    fn save_node(&self, node: &Node) -> LensResult<()> {
        self.db.with(|conn| node_ops::upsert_node(conn, node))
    }

    fn delete_node(&self, id: &str) -> LensResult<()> {
        self.db.with(|conn| {
            node_ops::delete_node(conn, id)?;
            Ok(())
        })
    }

    fn load_nodes(&self) -> LensResult<Vec<Node>> {
        self.db.with(node_ops::load_nodes)
    }

    fn save_edge(&self, edge: &Edge) -> LensResult<()> {
        self.db.with(|conn| edge_ops::upsert_edge(conn, edge))
    }

    fn delete_edge(&self, key: &EdgeKey) -> LensResult<()> {
        self.db.with(|conn| {
            edge_ops::delete_edge(conn, key)?;
            Ok(())
        })
    }

    fn load_edges(&self) -> LensResult<Vec<Edge>> {
        self.db.with(edge_ops::load_edges)
    }

    fn node_count(&self) -> LensResult<usize> {
        self.db.with(node_ops::count_nodes)
    }

    fn edge_count(&self) -> LensResult<usize> {
        self.db.with(edge_ops::count_edges)
    }
}
