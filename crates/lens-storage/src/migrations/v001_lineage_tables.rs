//! v001: lineage_nodes, lineage_edges.
//!
//! Timestamps are RFC 3339 text in UTC. Attributes and tags are JSON.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS lineage_nodes (
    id          TEXT PRIMARY KEY,
    node_type   TEXT NOT NULL,
    attributes  TEXT NOT NULL DEFAULT '{}',
    tags        TEXT NOT NULL DEFAULT '[]',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_nodes_type ON lineage_nodes(node_type);

CREATE TABLE IF NOT EXISTS lineage_edges (
    source_id   TEXT NOT NULL,
    target_id   TEXT NOT NULL,
    relation    TEXT NOT NULL,
    attributes  TEXT NOT NULL DEFAULT '{}',
    valid_from  TEXT NOT NULL,
    valid_to    TEXT,
    PRIMARY KEY (source_id, target_id, relation),
    FOREIGN KEY (source_id) REFERENCES lineage_nodes(id) ON DELETE CASCADE,
    FOREIGN KEY (target_id) REFERENCES lineage_nodes(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_edges_source ON lineage_edges(source_id);
CREATE INDEX IF NOT EXISTS idx_edges_target ON lineage_edges(target_id);
";
