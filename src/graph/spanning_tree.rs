//! A store decorator that keeps a running total of its edge weights.

use crate::config::GraphConfig;
use crate::contract::ContractHandle;
use crate::types::{EdgeId, GraphResult, Vertex, VertexId, WeightedEdge, DEFAULT_WEIGHT};

use super::{DirectedGraph, GraphStore};

/// A graph being built up as a spanning tree.
///
/// Wraps a [`GraphStore`] and updates the tree weight by each edge's intrinsic weight
/// whenever the store accepts an edge addition or removal. The total is never
/// recomputed from scratch.
#[derive(Debug)]
pub struct SpanningTree {
    store: GraphStore,
    weight: f64,
}

impl SpanningTree {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            store: GraphStore::with_config(config),
            weight: 0.0,
        }
    }

    /// Sum of the weights of the edges currently in the tree.
    pub fn tree_weight(&self) -> f64 {
        self.weight
    }

    /// The underlying store, read-only.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn into_store(self) -> GraphStore {
        self.store
    }

    pub fn add_contract(&mut self, contract: ContractHandle) -> GraphResult<()> {
        self.store.add_contract(contract)
    }

    pub fn remove_contract(&mut self, contract: &ContractHandle) -> bool {
        self.store.remove_contract(contract)
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> GraphResult<()> {
        self.store.add_vertex(vertex)
    }

    /// Add `edge` between `head` and `tail` and add its weight to the total.
    pub fn add_edge(
        &mut self,
        edge: WeightedEdge,
        head: VertexId,
        tail: VertexId,
    ) -> GraphResult<()> {
        let weight = edge.weight;
        self.store.add_edge(edge.into(), head, tail)?;
        self.weight += weight;
        Ok(())
    }

    /// Remove `edge` and subtract its weight from the total.
    pub fn remove_edge(&mut self, edge: EdgeId) -> GraphResult<()> {
        let weight = self
            .store
            .edge(edge)
            .map(|e| e.weight_or_default())
            .unwrap_or(DEFAULT_WEIGHT);
        self.store.remove_edge(edge)?;
        self.weight -= weight;
        Ok(())
    }
}

impl Default for SpanningTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectedGraph for SpanningTree {
    fn vertex_ids(&self) -> Vec<VertexId> {
        self.store.vertex_ids()
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.store.edge_ids()
    }

    fn incident_edges(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.store.incident_edges(vertex)
    }

    fn endpoints(&self, edge: EdgeId) -> Vec<VertexId> {
        self.store.endpoints(edge)
    }

    fn inbound(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.store.inbound(vertex)
    }

    fn outbound(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.store.outbound(vertex)
    }

    fn source(&self, edge: EdgeId) -> Option<VertexId> {
        self.store.source(edge)
    }

    fn target(&self, edge: EdgeId) -> Option<VertexId> {
        self.store.target(edge)
    }

    fn weight(&self, edge: EdgeId) -> f64 {
        self.store.weight(edge)
    }
}
