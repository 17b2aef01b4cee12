//! Node upsert, delete, load.

use rusqlite::{params, Connection, OptionalExtension, Row};

use lens_core::errors::LensResult;
use lens_core::models::{Node, NodeType};

use super::{format_ts, parse_ts};
use crate::{corrupt_row, to_storage_err};

const NODE_COLUMNS: &str = "id, node_type, attributes, tags, created_at, updated_at";

/// Insert or update a node. Uses `ON CONFLICT DO UPDATE` rather than
/// `INSERT OR REPLACE`: a replace deletes the row first, which would cascade
/// to every edge touching the node.
pub fn upsert_node(conn: &Connection, node: &Node) -> LensResult<()> {
    let attributes = serde_json::to_string(&node.attributes)?;
    let tags = serde_json::to_string(&node.tags)?;
    conn.execute(
        "INSERT INTO lineage_nodes (id, node_type, attributes, tags, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
            node_type  = excluded.node_type,
            attributes = excluded.attributes,
            tags       = excluded.tags,
            created_at = excluded.created_at,
            updated_at = excluded.updated_at",
        params![
            node.id,
            node.node_type.as_str(),
            attributes,
            tags,
            format_ts(&node.created_at),
            format_ts(&node.updated_at),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Delete a node; its edges go with it through the foreign-key cascade.
/// Returns whether a row was removed.
pub fn delete_node(conn: &Connection, id: &str) -> LensResult<bool> {
    let removed = conn
        .execute("DELETE FROM lineage_nodes WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}

pub fn get_node(conn: &Connection, id: &str) -> LensResult<Option<Node>> {
    let raw = conn
        .query_row(
            &format!("SELECT {NODE_COLUMNS} FROM lineage_nodes WHERE id = ?1"),
            params![id],
            read_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(decode).transpose()
}

/// All nodes, ordered by id.
pub fn load_nodes(conn: &Connection) -> LensResult<Vec<Node>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {NODE_COLUMNS} FROM lineage_nodes ORDER BY id"))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], read_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut nodes = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        nodes.push(decode(raw)?);
    }
    Ok(nodes)
}

pub fn count_nodes(conn: &Connection) -> LensResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM lineage_nodes", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

struct RawNodeRow {
    id: String,
    node_type: String,
    attributes: String,
    tags: String,
    created_at: String,
    updated_at: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawNodeRow> {
    Ok(RawNodeRow {
        id: row.get(0)?,
        node_type: row.get(1)?,
        attributes: row.get(2)?,
        tags: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn decode(raw: RawNodeRow) -> LensResult<Node> {
    let node_type = NodeType::from_str_name(&raw.node_type)
        .ok_or_else(|| corrupt_row(format!("node {}: unknown node_type {:?}", raw.id, raw.node_type)))?;
    let attributes = serde_json::from_str(&raw.attributes)
        .map_err(|e| corrupt_row(format!("node {}: attributes: {e}", raw.id)))?;
    let tags = serde_json::from_str(&raw.tags)
        .map_err(|e| corrupt_row(format!("node {}: tags: {e}", raw.id)))?;
    Ok(Node {
        created_at: parse_ts(&raw.created_at, "created_at")?,
        updated_at: parse_ts(&raw.updated_at, "updated_at")?,
        id: raw.id,
        node_type,
        attributes,
        tags,
    })
}
