//! Test fixture loader for LENS lineage graphs and adapter batches.
//!
//! Fixture JSON lives in the workspace-root `test-fixtures/` directory and is
//! shared by the tests of every crate.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use lens_core::models::{EdgeSpec, NodeSpec, RecordSpec};

/// Root directory of the fixture data.
fn fixtures_root() -> PathBuf {
    // Walk up from the calling crate until the data directory shows up. The
    // loader crate is itself called `test-fixtures`, so look for a data subdir.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);
    while !path.join("test-fixtures").join("lineage").is_dir() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures/lineage from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all JSON files in a fixture subdirectory, sorted by path.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// A lineage graph expressed as specs.
#[derive(Debug, Clone, Deserialize)]
pub struct LineageFixture {
    #[serde(default)]
    pub description: String,
    pub nodes: Vec<NodeSpec>,
    pub edges: Vec<EdgeSpec>,
}

impl LineageFixture {
    /// Node specs first, then edge specs.
    pub fn specs(&self) -> Vec<RecordSpec> {
        self.nodes
            .iter()
            .cloned()
            .map(RecordSpec::Node)
            .chain(self.edges.iter().cloned().map(RecordSpec::Edge))
            .collect()
    }
}

/// Load a graph from `test-fixtures/lineage/<name>.json`.
pub fn load_lineage(name: &str) -> LineageFixture {
    load_fixture(&format!("lineage/{name}.json"))
}
