//! v002: column mappings on lineage_edges, stored as a JSON array.

pub const MIGRATION_SQL: &str = "
ALTER TABLE lineage_edges ADD COLUMN columns TEXT NOT NULL DEFAULT '[]';
";
