//! Edge payloads: plain edges with an optional weight, and edges that always carry one.

use serde::{Deserialize, Serialize};

use super::{EdgeId, DEFAULT_WEIGHT};

/// A directed connector. Endpoints are supplied when the edge is added to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Identity of the edge.
    pub id: EdgeId,
    /// Optional human-readable label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Intrinsic weight, if the edge has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Edge {
    /// Create an unweighted, unlabelled edge.
    pub fn new(id: u64) -> Self {
        Self {
            id: EdgeId(id),
            label: None,
            weight: None,
        }
    }

    /// Attach an intrinsic weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whether the edge carries an intrinsic weight.
    pub fn is_weighted(&self) -> bool {
        self.weight.is_some()
    }

    /// The intrinsic weight, or [`DEFAULT_WEIGHT`] when there is none.
    pub fn weight_or_default(&self) -> f64 {
        self.weight.unwrap_or(DEFAULT_WEIGHT)
    }
}

/// An edge that always carries an explicit weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    pub id: EdgeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub weight: f64,
}

impl WeightedEdge {
    pub fn new(id: u64, weight: f64) -> Self {
        Self {
            id: EdgeId(id),
            label: None,
            weight,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<WeightedEdge> for Edge {
    fn from(edge: WeightedEdge) -> Self {
        Self {
            id: edge.id,
            label: edge.label,
            weight: Some(edge.weight),
        }
    }
}
