use serde::{Deserialize, Serialize};

use super::defaults;

/// Traversal engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Depth used when a query does not give one. `None` means "unbounded",
    /// which is still capped by `depth_ceiling`.
    pub default_max_depth: Option<usize>,
    /// Hard upper bound on any requested depth.
    pub depth_ceiling: usize,
    /// Follow edges whose validity window has closed.
    pub include_invalidated: bool,
}

impl TraversalConfig {
    /// Resolve a requested depth against the default and the ceiling.
    pub fn effective_depth(&self, requested: Option<usize>) -> usize {
        requested
            .or(self.default_max_depth)
            .unwrap_or(self.depth_ceiling)
            .min(self.depth_ceiling)
    }
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            default_max_depth: None,
            depth_ceiling: defaults::DEFAULT_DEPTH_CEILING,
            include_invalidated: defaults::DEFAULT_INCLUDE_INVALIDATED,
        }
    }
}
