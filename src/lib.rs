//! weighted-digraph: an in-memory directed, weighted graph store.
//!
//! Vertices and edges are indexed in insertion order with inbound and
//! outbound adjacency per vertex. Every mutation is first offered to the
//! store's registered contracts, any of which may veto it. Algorithms read
//! the graph through the [`DirectedGraph`] trait.

pub mod algo;
pub mod config;
pub mod contract;
pub mod graph;
pub mod types;

// Re-export commonly used types at the crate root
pub use algo::{connected_components, connected_components_directed, is_reachable};
pub use config::{load_config, GraphConfig, VertexRemoval};
pub use contract::{
    AcyclicContract, Contract, ContractHandle, ContractPipeline, EndpointMembershipContract,
    Mutation, OneEdgeContract, Verdict, Violation,
};
pub use graph::{
    depth_first, DirectedGraph, GraphStore, GraphSummary, SpanningTree, TraversalDirection,
    VertexCollector, VisitHandler, VisitState,
};
pub use types::{
    Edge, EdgeId, GraphError, GraphResult, LookupError, StoreId, Vertex, VertexId, WeightedEdge,
    DEFAULT_WEIGHT,
};
