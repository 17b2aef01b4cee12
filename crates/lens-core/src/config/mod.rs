mod classifier_config;
pub mod defaults;
mod ingestion_config;
mod observability_config;
mod storage_config;
mod traversal_config;

pub use classifier_config::{ClassifierConfig, CriticalityRules, RiskThresholds};
pub use ingestion_config::IngestionConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;
pub use traversal_config::TraversalConfig;

use serde::{Deserialize, Serialize};

use crate::errors::{LensError, LensResult};

/// Top-level configuration. Every section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LensConfig {
    pub traversal: TraversalConfig,
    pub classifier: ClassifierConfig,
    pub ingestion: IngestionConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

impl LensConfig {
    /// Parse a (possibly partial) TOML document.
    pub fn from_toml(toml_str: &str) -> LensResult<Self> {
        let config: Self = toml::from_str(toml_str).map_err(|e| LensError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> LensResult<()> {
        if self.traversal.depth_ceiling == 0 {
            return Err(LensError::Config {
                reason: "traversal.depth_ceiling must be at least 1".to_string(),
            });
        }
        if self.ingestion.id_separator.is_empty() {
            return Err(LensError::Config {
                reason: "ingestion.id_separator must not be empty".to_string(),
            });
        }
        if let Some((key, _)) = self
            .classifier
            .rules
            .attribute_equals
            .iter()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(LensError::Config {
                reason: format!("classifier.rules.attribute_equals.{key} is not a finite number"),
            });
        }
        Ok(())
    }
}
