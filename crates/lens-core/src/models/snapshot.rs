use serde::{Deserialize, Serialize};

use super::{Edge, Node};
use crate::errors::LensResult;

/// Full serialization of a graph, sufficient to rebuild it on restart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> LensResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> LensResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
