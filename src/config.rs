//! Store configuration, loadable from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::GraphResult;

/// What happens to incident edges when a vertex is removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexRemoval {
    /// Remove every incident edge together with the vertex.
    #[default]
    Cascade,
    /// Refuse to remove a vertex that still has incident edges.
    Reject,
}

/// Configuration for a [`GraphStore`](crate::graph::GraphStore).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Vertex removal policy.
    #[serde(default)]
    pub vertex_removal: VertexRemoval,
    /// Number of vertices to reserve space for.
    #[serde(default)]
    pub vertex_capacity: usize,
    /// Number of edges to reserve space for.
    #[serde(default)]
    pub edge_capacity: usize,
}

impl GraphConfig {
    /// Parse a configuration from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_vertex_removal(mut self, policy: VertexRemoval) -> Self {
        self.vertex_removal = policy;
        self
    }

    pub fn with_capacity(mut self, vertices: usize, edges: usize) -> Self {
        self.vertex_capacity = vertices;
        self.edge_capacity = edges;
        self
    }
}

/// Load configuration from a JSON file.
pub fn load_config(path: impl AsRef<Path>) -> GraphResult<GraphConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to read config file {}: {e}", path.display()),
        )
    })?;
    let config = GraphConfig::from_json(&content)?;
    log::debug!("Loaded graph config from {}: {:?}", path.display(), config);
    Ok(config)
}
