//! The vertex payload.

use serde::{Deserialize, Serialize};

use super::VertexId;

/// A node handed to the store. The store indexes it by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Identity of the vertex.
    pub id: VertexId,
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Vertex {
    /// Create an unlabelled vertex.
    pub fn new(id: u64) -> Self {
        Self {
            id: VertexId(id),
            label: None,
        }
    }

    /// Create a labelled vertex.
    pub fn labelled(id: u64, label: impl Into<String>) -> Self {
        Self {
            id: VertexId(id),
            label: Some(label.into()),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
