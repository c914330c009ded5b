//! Error types for the graph store.

use thiserror::Error;

use super::{EdgeId, StoreId, VertexId};

/// A lookup that found no entry in one of the store's indices.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The vertex is not in the vertex set.
    #[error("vertex {0} is not indexed")]
    Vertex(VertexId),

    /// The edge is not in the edge set.
    #[error("edge {0} is not indexed")]
    Edge(EdgeId),

    /// The vertex has no outbound entry for the edge.
    #[error("vertex {vertex} has no outbound entry for edge {edge}")]
    Outbound { vertex: VertexId, edge: EdgeId },

    /// The vertex has no inbound entry for the edge.
    #[error("vertex {vertex} has no inbound entry for edge {edge}")]
    Inbound { vertex: VertexId, edge: EdgeId },
}

/// All errors that can occur while mutating or configuring a graph.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A registered contract vetoed a mutation. The store is unchanged.
    #[error("Contract '{contract}' rejected {operation}: {reason}")]
    ContractViolation {
        contract: String,
        operation: &'static str,
        reason: String,
    },

    /// A contract did not accept the store's state when it was added.
    #[error("Contract '{contract}' failed verification: {reason}")]
    VerificationFailed { contract: String, reason: String },

    /// The contract is already verifying a store.
    #[error("Contract '{contract}' is bound to {store}: re-entry not allowed")]
    Reentry { contract: String, store: StoreId },

    /// An index entry required by the operation is absent.
    #[error("Missing reference during {operation}")]
    MissingReference {
        operation: &'static str,
        #[source]
        cause: LookupError,
    },

    /// The edge identity is already indexed.
    #[error("Edge {0} is already indexed")]
    DuplicateEdge(EdgeId),

    /// The vertex cannot be removed while edges still reference it.
    #[error("Vertex {vertex} still has {edges} incident edge(s)")]
    VertexInUse { vertex: VertexId, edges: usize },

    /// Weights must be finite.
    #[error("Invalid weight for edge {edge}: {weight}")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn missing(operation: &'static str, cause: LookupError) -> Self {
        Self::MissingReference { operation, cause }
    }
}

/// Convenience result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
