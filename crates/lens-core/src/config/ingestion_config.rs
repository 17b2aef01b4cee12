use serde::{Deserialize, Serialize};

use super::defaults;

/// Ingestion normalizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestionConfig {
    /// Lower-case canonical ids.
    pub lowercase_ids: bool,
    /// Separator between `system`, `schema`, and `name` in canonical ids.
    pub id_separator: String,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            lowercase_ids: defaults::DEFAULT_LOWERCASE_IDS,
            id_separator: defaults::DEFAULT_ID_SEPARATOR.to_string(),
        }
    }
}
