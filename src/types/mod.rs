//! Identifiers, payload types and errors shared by every module.

pub mod edge;
pub mod error;
pub mod vertex;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub use edge::{Edge, WeightedEdge};
pub use error::{GraphError, GraphResult, LookupError};
pub use vertex::Vertex;

/// Weight reported for an edge that carries none.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Identity of a vertex. Equality is the only meaningful relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u64);

/// Identity of an edge. Equality is the only meaningful relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

impl From<u64> for VertexId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<u64> for EdgeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`GraphStore`](crate::graph::GraphStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StoreId(u64);

impl StoreId {
    pub(crate) fn next() -> Self {
        Self(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store#{}", self.0)
    }
}
