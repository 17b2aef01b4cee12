//! Edge upsert, delete, load.

use rusqlite::{params, Connection, OptionalExtension, Row};

use lens_core::errors::LensResult;
use lens_core::models::{Edge, EdgeKey, Relation};

use super::{format_ts, parse_ts};
use crate::{corrupt_row, to_storage_err};

const EDGE_COLUMNS: &str = "source_id, target_id, relation, attributes, columns, valid_from, valid_to";

/// Insert or update an edge by its (source, target, relation) key.
/// Both endpoints must already be stored.
pub fn upsert_edge(conn: &Connection, edge: &Edge) -> LensResult<()> {
    let attributes = serde_json::to_string(&edge.attributes)?;
    let columns = serde_json::to_string(&edge.columns)?;
    conn.execute(
        "INSERT INTO lineage_edges (source_id, target_id, relation, attributes, columns, valid_from, valid_to)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(source_id, target_id, relation) DO UPDATE SET
            attributes = excluded.attributes,
            columns    = excluded.columns,
            valid_from = excluded.valid_from,
            valid_to   = excluded.valid_to",
        params![
            edge.source_id,
            edge.target_id,
            edge.relation.as_str(),
            attributes,
            columns,
            format_ts(&edge.valid_from),
            edge.valid_to.as_ref().map(format_ts),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn delete_edge(conn: &Connection, key: &EdgeKey) -> LensResult<bool> {
    let removed = conn
        .execute(
            "DELETE FROM lineage_edges WHERE source_id = ?1 AND target_id = ?2 AND relation = ?3",
            params![key.source_id, key.target_id, key.relation.as_str()],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(removed > 0)
}

pub fn get_edge(conn: &Connection, key: &EdgeKey) -> LensResult<Option<Edge>> {
    let raw = conn
        .query_row(
            &format!(
                "SELECT {EDGE_COLUMNS} FROM lineage_edges
                 WHERE source_id = ?1 AND target_id = ?2 AND relation = ?3"
            ),
            params![key.source_id, key.target_id, key.relation.as_str()],
            read_row,
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(decode).transpose()
}

/// Edges touching `node_id` from either side.
pub fn edges_for_node(conn: &Connection, node_id: &str) -> LensResult<Vec<Edge>> {
    collect(
        conn,
        &format!(
            "SELECT {EDGE_COLUMNS} FROM lineage_edges
             WHERE source_id = ?1 OR target_id = ?1
             ORDER BY source_id, target_id, relation"
        ),
        params![node_id],
    )
}

/// All edges, ordered by key.
pub fn load_edges(conn: &Connection) -> LensResult<Vec<Edge>> {
    collect(
        conn,
        &format!("SELECT {EDGE_COLUMNS} FROM lineage_edges ORDER BY source_id, target_id, relation"),
        [],
    )
}

pub fn count_edges(conn: &Connection) -> LensResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM lineage_edges", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

fn collect<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> LensResult<Vec<Edge>> {
    let mut stmt = conn.prepare(sql).map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, read_row)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut edges = Vec::new();
    for row in rows {
        let raw = row.map_err(|e| to_storage_err(e.to_string()))?;
        edges.push(decode(raw)?);
    }
    Ok(edges)
}

struct RawEdgeRow {
    source_id: String,
    target_id: String,
    relation: String,
    attributes: String,
    columns: String,
    valid_from: String,
    valid_to: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawEdgeRow> {
    Ok(RawEdgeRow {
        source_id: row.get(0)?,
        target_id: row.get(1)?,
        relation: row.get(2)?,
        attributes: row.get(3)?,
        columns: row.get(4)?,
        valid_from: row.get(5)?,
        valid_to: row.get(6)?,
    })
}

fn decode(raw: RawEdgeRow) -> LensResult<Edge> {
    let label = format!("edge {} -> {}", raw.source_id, raw.target_id);
    let relation = Relation::from_str_name(&raw.relation)
        .ok_or_else(|| corrupt_row(format!("{label}: unknown relation {:?}", raw.relation)))?;
    let attributes = serde_json::from_str(&raw.attributes)
        .map_err(|e| corrupt_row(format!("{label}: attributes: {e}")))?;
    let columns = serde_json::from_str(&raw.columns)
        .map_err(|e| corrupt_row(format!("{label}: columns: {e}")))?;
    let valid_to = raw
        .valid_to
        .as_deref()
        .map(|ts| parse_ts(ts, "valid_to"))
        .transpose()?;
    Ok(Edge {
        valid_from: parse_ts(&raw.valid_from, "valid_from")?,
        valid_to,
        source_id: raw.source_id,
        target_id: raw.target_id,
        relation,
        attributes,
        columns,
    })
}
