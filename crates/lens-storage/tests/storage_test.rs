//! File-backed persistence: restart survival, cascades, temporal edges,
//! and hydrating a lineage engine from SQLite.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use lens_core::config::StorageConfig;
use lens_core::errors::{LensError, StorageError};
use lens_core::models::{
    AttributeValue, ColumnMapping, Edge, EdgeKey, EdgeSpec, Node, NodeSpec, NodeType, Relation,
    TransformationType,
};
use lens_core::traits::ILineageStorage;
use lens_graph::{LineageEngine, TraversalQuery};
use lens_storage::StorageEngine;

fn node(id: &str, node_type: NodeType) -> Node {
    let now = Utc::now();
    Node {
        id: id.to_string(),
        node_type,
        attributes: [
            ("owner".to_string(), AttributeValue::Text("sales".into())),
            ("tier".to_string(), AttributeValue::Integer(1)),
            ("row_share".to_string(), AttributeValue::Float(0.25)),
            ("certified".to_string(), AttributeValue::Bool(true)),
        ]
        .into_iter()
        .collect(),
        tags: ["pii".to_string()].into_iter().collect(),
        created_at: now - Duration::days(3),
        updated_at: now,
    }
}

fn edge(source: &str, target: &str, relation: Relation) -> Edge {
    Edge {
        source_id: source.to_string(),
        target_id: target.to_string(),
        relation,
        attributes: [("job".to_string(), AttributeValue::Text("nightly".into()))]
            .into_iter()
            .collect(),
        valid_from: Utc::now() - Duration::hours(6),
        valid_to: None,
        columns: Vec::new(),
    }
}

fn seeded(storage: &StorageEngine) {
    storage.save_node(&node("raw", NodeType::Table)).unwrap();
    storage.save_node(&node("clean", NodeType::View)).unwrap();
    storage.save_node(&node("board", NodeType::Report)).unwrap();
    storage.save_edge(&edge("raw", "clean", Relation::Transforms)).unwrap();
    storage.save_edge(&edge("clean", "board", Relation::Feeds)).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// RESTART SURVIVAL
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn rows_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lens.db");

    let original = node("raw", NodeType::Table);
    {
        let storage = StorageEngine::open(&path).unwrap();
        seeded(&storage);
        storage.save_node(&original).unwrap();
    }

    let storage = StorageEngine::open(&path).unwrap();
    assert_eq!(storage.node_count().unwrap(), 3);
    assert_eq!(storage.edge_count().unwrap(), 2);
    assert_eq!(storage.get_node("raw").unwrap(), Some(original));
    assert_eq!(storage.db_path(), Some(path.as_path()));
}

#[test]
fn file_database_uses_wal_and_latest_schema() {
    let dir = TempDir::new().unwrap();
    let storage = StorageEngine::from_config(&StorageConfig {
        db_path: dir.path().join("wal.db").to_string_lossy().into_owned(),
        busy_timeout_ms: 1_000,
    })
    .unwrap();
    assert!(storage.is_wal_mode().unwrap());
    assert_eq!(
        storage.schema_version().unwrap(),
        lens_storage::migrations::LATEST_VERSION
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// REFERENTIAL INTEGRITY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn deleting_a_node_cascades_to_its_edges() {
    let storage = StorageEngine::open_in_memory().unwrap();
    seeded(&storage);

    storage.delete_node("clean").unwrap();
    assert_eq!(storage.node_count().unwrap(), 2);
    assert_eq!(storage.edge_count().unwrap(), 0);
    assert!(storage.edges_for_node("raw").unwrap().is_empty());
}

#[test]
fn updating_a_node_keeps_its_edges() {
    let storage = StorageEngine::open_in_memory().unwrap();
    seeded(&storage);

    let mut updated = node("clean", NodeType::Table);
    updated.tags.insert("tier1".into());
    storage.save_node(&updated).unwrap();

    assert_eq!(storage.edges_for_node("clean").unwrap().len(), 2);
    assert_eq!(storage.get_node("clean").unwrap().unwrap().node_type, NodeType::Table);
}

#[test]
fn edge_to_missing_node_is_a_storage_error() {
    let storage = StorageEngine::open_in_memory().unwrap();
    storage.save_node(&node("raw", NodeType::Table)).unwrap();
    let err = storage
        .save_edge(&edge("raw", "ghost", Relation::Feeds))
        .unwrap_err();
    assert!(matches!(err, LensError::Storage(StorageError::SqliteError { .. })));
}

#[test]
fn deleting_absent_rows_is_not_an_error() {
    let storage = StorageEngine::open_in_memory().unwrap();
    storage.delete_node("nope").unwrap();
    storage
        .delete_edge(&EdgeKey::new("a", "b", Relation::Copies))
        .unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// EDGES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn same_key_edge_is_updated_in_place() {
    let storage = StorageEngine::open_in_memory().unwrap();
    seeded(&storage);

    let mut closed = edge("raw", "clean", Relation::Transforms);
    closed.valid_to = Some(Utc::now());
    storage.save_edge(&closed).unwrap();
    assert_eq!(storage.edge_count().unwrap(), 2);

    let stored = storage.get_edge(&closed.key()).unwrap().unwrap();
    assert_eq!(stored, closed);
    assert!(!stored.is_active());

    // Same endpoints, different relation: a separate edge.
    storage.save_edge(&edge("raw", "clean", Relation::Copies)).unwrap();
    assert_eq!(storage.edge_count().unwrap(), 3);

    storage.delete_edge(&closed.key()).unwrap();
    assert_eq!(storage.get_edge(&closed.key()).unwrap(), None);
}

#[test]
fn column_mappings_are_stored_with_the_edge() {
    let storage = StorageEngine::open_in_memory().unwrap();
    seeded(&storage);

    let mut mapped = edge("raw", "clean", Relation::Transforms);
    mapped.columns = vec![
        ColumnMapping::new("id", "order_id"),
        ColumnMapping::new("amt", "amount")
            .with_transformation(TransformationType::Aggregate, "SUM(amt)")
            .with_confidence(0.75),
    ];
    storage.save_edge(&mapped).unwrap();
    assert_eq!(storage.get_edge(&mapped.key()).unwrap().unwrap().columns, mapped.columns);

    mapped.columns.truncate(1);
    storage.save_edge(&mapped).unwrap();
    let stored = storage.get_edge(&mapped.key()).unwrap().unwrap();
    assert_eq!(stored.columns, vec![ColumnMapping::new("id", "order_id")]);
}

#[test]
fn load_is_ordered_by_key() {
    let storage = StorageEngine::open_in_memory().unwrap();
    seeded(&storage);
    let ids: Vec<String> = storage.load_nodes().unwrap().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec!["board", "clean", "raw"]);
    let sources: Vec<String> = storage
        .load_edges()
        .unwrap()
        .into_iter()
        .map(|e| e.source_id)
        .collect();
    assert_eq!(sources, vec!["clean", "raw"]);
}

// ═══════════════════════════════════════════════════════════════════════════
// ENGINE INTEGRATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn engine_hydrates_from_sqlite_after_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lineage.db");

    let before = {
        let storage = Arc::new(StorageEngine::open(&path).unwrap());
        let engine = LineageEngine::new().with_storage(storage);
        engine.store().apply_batch(test_fixtures::load_lineage("orders_pipeline").specs()).unwrap();
        engine.flush().unwrap();
        engine
            .invalidate_edge(
                &EdgeKey::new(
                    "postgres.stage.orders_clean",
                    "looker.sales.daily_sales_overview",
                    Relation::Feeds,
                ),
                None,
            )
            .unwrap();
        engine.snapshot().unwrap()
    };

    let engine = LineageEngine::new().with_storage(Arc::new(StorageEngine::open(&path).unwrap()));
    assert_eq!(engine.hydrate().unwrap(), before.nodes.len());
    assert_eq!(engine.snapshot().unwrap(), before);

    let down = engine
        .descendants("postgres.raw.orders_raw", &TraversalQuery::default())
        .unwrap();
    assert!(!down.contains("looker.sales.daily_sales_overview"));
}

#[test]
fn engine_mutations_write_through() {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = LineageEngine::new().with_storage(storage.clone());
    engine.upsert_node(NodeSpec::new("a", NodeType::Table)).unwrap();
    engine.upsert_node(NodeSpec::new("b", NodeType::View)).unwrap();
    engine
        .upsert_edge(EdgeSpec::new("a", "b", Relation::DerivesFrom).with_attribute("job", "dbt"))
        .unwrap();
    assert_eq!(storage.edge_count().unwrap(), 1);

    engine.delete_node("a").unwrap();
    assert_eq!(storage.node_count().unwrap(), 1);
    assert_eq!(storage.edge_count().unwrap(), 0);
}

#[test]
fn rejected_sqlite_write_leaves_the_graph_unchanged() {
    // The graph knows both endpoints but the database does not, so the
    // foreign keys refuse the edge.
    let unsynced = LineageEngine::new();
    unsynced.upsert_node(NodeSpec::new("a", NodeType::Table)).unwrap();
    unsynced.upsert_node(NodeSpec::new("b", NodeType::Table)).unwrap();
    let before = unsynced.snapshot().unwrap();

    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let engine = unsynced.with_storage(storage.clone());
    let err = engine
        .upsert_edge(EdgeSpec::new("a", "b", Relation::Feeds))
        .unwrap_err();
    assert!(matches!(err, LensError::Storage(_)));
    assert_eq!(engine.snapshot().unwrap(), before);
    assert_eq!(storage.edge_count().unwrap(), 0);
}
