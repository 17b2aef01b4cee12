// Single source of truth for all default values.

// --- Traversal ---
pub const DEFAULT_DEPTH_CEILING: usize = 50;
pub const DEFAULT_INCLUDE_INVALIDATED: bool = false;

// --- Classifier ---
pub const DEFAULT_RISK_MEDIUM_TOTAL: usize = 5;
pub const DEFAULT_RISK_HIGH_TOTAL: usize = 20;
pub const DEFAULT_RISK_CRITICAL_TOTAL: usize = 50;
pub const DEFAULT_RISK_HIGH_CRITICAL_NODES: usize = 1;
pub const DEFAULT_RISK_CRITICAL_CRITICAL_NODES: usize = 3;

// --- Ingestion ---
pub const DEFAULT_LOWERCASE_IDS: bool = true;
pub const DEFAULT_ID_SEPARATOR: &str = ".";

// --- Query ---
pub const DEFAULT_QUERY_LIMIT: usize = 100;

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "lens.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
