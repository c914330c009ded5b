//! In-memory graph operations: the store, its traversal and the spanning-tree wrapper.

pub mod spanning_tree;
pub mod store;
pub mod traversal;

use crate::types::{EdgeId, VertexId};

pub use spanning_tree::SpanningTree;
pub use store::{GraphStore, GraphSummary};
pub use traversal::{depth_first, TraversalDirection, VertexCollector, VisitHandler, VisitState};

/// Read-only view of a directed graph.
///
/// This is everything exporters, builders and algorithms may rely on.
/// Collections are returned as snapshots in the graph's iteration order,
/// so holding one never pins the graph.
pub trait DirectedGraph {
    /// All vertices.
    fn vertex_ids(&self) -> Vec<VertexId>;

    /// All edges.
    fn edge_ids(&self) -> Vec<EdgeId>;

    /// Edges touching `vertex` in either direction, without duplicates.
    fn incident_edges(&self, vertex: VertexId) -> Vec<EdgeId>;

    /// The distinct endpoints of `edge` (empty if the edge is unknown).
    fn endpoints(&self, edge: EdgeId) -> Vec<VertexId>;

    /// Edges whose target is `vertex`.
    fn inbound(&self, vertex: VertexId) -> Vec<EdgeId>;

    /// Edges whose source is `vertex`.
    fn outbound(&self, vertex: VertexId) -> Vec<EdgeId>;

    fn source(&self, edge: EdgeId) -> Option<VertexId>;

    fn target(&self, edge: EdgeId) -> Option<VertexId>;

    /// Weight of `edge`; [`DEFAULT_WEIGHT`](crate::types::DEFAULT_WEIGHT) when none is stored.
    fn weight(&self, edge: EdgeId) -> f64;
}
