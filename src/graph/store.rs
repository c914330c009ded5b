//! Core graph store: vertices, edges and their dual adjacency indexes.

use std::collections::HashMap;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::config::{GraphConfig, VertexRemoval};
use crate::contract::{ContractHandle, ContractPipeline, Mutation};
use crate::types::{
    Edge, EdgeId, GraphError, GraphResult, LookupError, StoreId, Vertex, VertexId,
    DEFAULT_WEIGHT,
};

use super::DirectedGraph;

/// Endpoint and weight entries for one edge. Dropped as a unit on removal.
#[derive(Debug, Clone)]
struct EdgeEntry {
    edge: Edge,
    source: VertexId,
    target: VertexId,
    /// Stored weight. `None` reads as [`DEFAULT_WEIGHT`].
    weight: Option<f64>,
}

/// Counts and totals describing a store, for logs and exporters.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub store: StoreId,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub first_vertex: Option<VertexId>,
    pub total_weight: f64,
    pub contracts: Vec<String>,
}

/// The in-memory directed graph holding vertices, edges and their adjacency.
///
/// Vertex and edge sets as well as the per-vertex inbound/outbound sets keep
/// insertion order, so traversal order is deterministic. Every mutation is
/// offered to the registered contracts before any index is touched.
///
/// Edge insertion does not require the endpoints to be member vertices; use
/// [`EndpointMembershipContract`](crate::contract::EndpointMembershipContract)
/// to enforce that.
#[derive(Debug)]
pub struct GraphStore {
    id: StoreId,
    config: GraphConfig,
    /// First vertex ever added. Kept even after that vertex is removed.
    first_vertex: Option<VertexId>,
    vertices: IndexMap<VertexId, Vertex>,
    edges: IndexMap<EdgeId, EdgeEntry>,
    /// Vertex -> edges whose source is that vertex.
    outbound: HashMap<VertexId, IndexSet<EdgeId>>,
    /// Vertex -> edges whose target is that vertex.
    inbound: HashMap<VertexId, IndexSet<EdgeId>>,
    contracts: ContractPipeline,
}

impl GraphStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Create an empty store.
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            id: StoreId::next(),
            first_vertex: None,
            vertices: IndexMap::with_capacity(config.vertex_capacity),
            edges: IndexMap::with_capacity(config.edge_capacity),
            outbound: HashMap::with_capacity(config.vertex_capacity),
            inbound: HashMap::with_capacity(config.vertex_capacity),
            contracts: ContractPipeline::new(),
            config,
        }
    }

    /// Copy vertices, edges, endpoints and weights into a new store.
    ///
    /// The copy has its own identity and no contracts.
    pub fn detached_copy(&self) -> Self {
        Self {
            id: StoreId::next(),
            config: self.config.clone(),
            first_vertex: self.first_vertex,
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            outbound: self.outbound.clone(),
            inbound: self.inbound.clone(),
            contracts: ContractPipeline::new(),
        }
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// The first vertex ever added to this store.
    pub fn first_vertex(&self) -> Option<VertexId> {
        self.first_vertex
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertices.contains_key(&vertex)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.edges.contains_key(&edge)
    }

    /// Get a vertex payload by ID.
    pub fn vertex(&self, vertex: VertexId) -> Option<&Vertex> {
        self.vertices.get(&vertex)
    }

    /// Get an edge payload by ID.
    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(&edge).map(|entry| &entry.edge)
    }

    /// All vertex payloads, in insertion order.
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &Vertex> + '_ {
        self.vertices.values()
    }

    /// All edge payloads, in insertion order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = &Edge> + '_ {
        self.edges.values().map(|entry| &entry.edge)
    }

    /// The registered contracts.
    pub fn contracts(&self) -> &ContractPipeline {
        &self.contracts
    }

    /// Sum of the weights of all edges.
    pub fn total_weight(&self) -> f64 {
        self.edges
            .values()
            .map(|entry| entry.weight.unwrap_or(DEFAULT_WEIGHT))
            .sum()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            store: self.id,
            vertex_count: self.vertex_count(),
            edge_count: self.edge_count(),
            first_vertex: self.first_vertex,
            total_weight: self.total_weight(),
            contracts: self.contracts.names(),
        }
    }

    /// Bind `contract` to this store, verify the current state, then register it.
    ///
    /// Fails with [`GraphError::Reentry`] if the contract is already bound,
    /// and with [`GraphError::VerificationFailed`] if it rejects the current state.
    /// Either way the contract is not registered.
    pub fn add_contract(&mut self, contract: ContractHandle) -> GraphResult<()> {
        ContractPipeline::admit(&contract, self)?;
        self.contracts.push(contract);
        Ok(())
    }

    /// Unregister `contract` and release its binding. Returns whether it was registered.
    pub fn remove_contract(&mut self, contract: &ContractHandle) -> bool {
        let id = self.id;
        self.contracts.unregister(contract, id)
    }

    /// Add a vertex. Adding a vertex that is already present is a no-op.
    pub fn add_vertex(&mut self, vertex: Vertex) -> GraphResult<()> {
        self.contracts
            .prepare(self, &[Mutation::AddVertex(&vertex)])?;

        let id = vertex.id;
        if self.first_vertex.is_none() {
            self.first_vertex = Some(id);
        }
        match self.vertices.entry(id) {
            Entry::Occupied(_) => return Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(vertex);
            }
        }
        log::debug!("{}: added vertex {}", self.id, id);

        if let Some(stored) = self.vertices.get(&id) {
            self.contracts.commit(self, &Mutation::AddVertex(stored));
        }
        Ok(())
    }

    /// Remove a vertex.
    ///
    /// Incident edges are handled according to [`GraphConfig::vertex_removal`]:
    /// either removed along with the vertex (every removal is offered to the
    /// contracts first) or the call fails with [`GraphError::VertexInUse`].
    pub fn remove_vertex(&mut self, vertex: VertexId) -> GraphResult<()> {
        if !self.vertices.contains_key(&vertex) {
            return Err(GraphError::missing(
                "remove_vertex",
                LookupError::Vertex(vertex),
            ));
        }

        let incident = self.incident_edges(vertex);
        if !incident.is_empty() && self.config.vertex_removal == VertexRemoval::Reject {
            return Err(GraphError::VertexInUse {
                vertex,
                edges: incident.len(),
            });
        }

        let mut links = Vec::with_capacity(incident.len());
        for &edge in &incident {
            links.push((edge, self.edge_links(edge, "remove_vertex")?));
        }

        let mut mutations: Vec<Mutation<'_>> =
            incident.iter().map(|&edge| Mutation::RemoveEdge(edge)).collect();
        mutations.push(Mutation::RemoveVertex(vertex));
        self.contracts.prepare(self, &mutations)?;

        for &(edge, (source, target)) in &links {
            self.unlink_edge(edge, source, target);
        }
        self.vertices.shift_remove(&vertex);
        self.outbound.remove(&vertex);
        self.inbound.remove(&vertex);
        log::debug!(
            "{}: removed vertex {} ({} incident edge(s))",
            self.id,
            vertex,
            incident.len()
        );

        for mutation in &mutations {
            self.contracts.commit(self, mutation);
        }
        Ok(())
    }

    /// Add `edge` from `source` to `target`.
    ///
    /// The stored weight is the edge's intrinsic weight, if it has one. An
    /// unweighted edge reads as [`DEFAULT_WEIGHT`] until a weight is given
    /// with [`set_weight`](Self::set_weight). The edge is appended to the end
    /// of the outbound set of `source` and the inbound set of `target`.
    pub fn add_edge(&mut self, edge: Edge, source: VertexId, target: VertexId) -> GraphResult<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        if let Some(weight) = edge.weight {
            check_weight(edge.id, weight)?;
        }

        self.contracts.prepare(
            self,
            &[Mutation::AddEdge {
                edge: &edge,
                source,
                target,
            }],
        )?;

        let id = edge.id;
        let weight = edge.weight;
        self.outbound.entry(source).or_default().insert(id);
        self.inbound.entry(target).or_default().insert(id);
        self.edges.insert(
            id,
            EdgeEntry {
                edge,
                source,
                target,
                weight,
            },
        );
        log::debug!("{}: added edge {} {} -> {}", self.id, id, source, target);

        if let Some(entry) = self.edges.get(&id) {
            let mutation = Mutation::AddEdge {
                edge: &entry.edge,
                source,
                target,
            };
            self.contracts.commit(self, &mutation);
        }
        Ok(())
    }

    /// Remove an edge and all of its index entries.
    ///
    /// Every entry is checked before anything is removed, so a failed call
    /// leaves the store untouched. The remaining adjacency entries keep their
    /// order; adding the edge again appends it at the end.
    pub fn remove_edge(&mut self, edge: EdgeId) -> GraphResult<()> {
        let (source, target) = self.edge_links(edge, "remove_edge")?;
        self.contracts
            .prepare(self, &[Mutation::RemoveEdge(edge)])?;

        self.unlink_edge(edge, source, target);
        log::debug!("{}: removed edge {} {} -> {}", self.id, edge, source, target);

        self.contracts.commit(self, &Mutation::RemoveEdge(edge));
        Ok(())
    }

    /// Replace the stored weight of `edge`.
    pub fn set_weight(&mut self, edge: EdgeId, weight: f64) -> GraphResult<()> {
        check_weight(edge, weight)?;
        let entry = self
            .edges
            .get_mut(&edge)
            .ok_or_else(|| GraphError::missing("set_weight", LookupError::Edge(edge)))?;
        entry.weight = Some(weight);
        Ok(())
    }

    /// Resolve and cross-check the endpoints of an indexed edge.
    fn edge_links(
        &self,
        edge: EdgeId,
        operation: &'static str,
    ) -> GraphResult<(VertexId, VertexId)> {
        let entry = self
            .edges
            .get(&edge)
            .ok_or_else(|| GraphError::missing(operation, LookupError::Edge(edge)))?;
        let (source, target) = (entry.source, entry.target);

        if !self
            .outbound
            .get(&source)
            .is_some_and(|set| set.contains(&edge))
        {
            return Err(GraphError::missing(
                operation,
                LookupError::Outbound {
                    vertex: source,
                    edge,
                },
            ));
        }
        if !self
            .inbound
            .get(&target)
            .is_some_and(|set| set.contains(&edge))
        {
            return Err(GraphError::missing(
                operation,
                LookupError::Inbound {
                    vertex: target,
                    edge,
                },
            ));
        }
        Ok((source, target))
    }

    /// Drop every index entry of an edge whose links were checked by `edge_links`.
    fn unlink_edge(&mut self, edge: EdgeId, source: VertexId, target: VertexId) {
        if let Some(set) = self.outbound.get_mut(&source) {
            set.shift_remove(&edge);
            if set.is_empty() {
                self.outbound.remove(&source);
            }
        }
        if let Some(set) = self.inbound.get_mut(&target) {
            set.shift_remove(&edge);
            if set.is_empty() {
                self.inbound.remove(&target);
            }
        }
        self.edges.shift_remove(&edge);
    }
}

fn check_weight(edge: EdgeId, weight: f64) -> GraphResult<()> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight { edge, weight })
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GraphStore {
    fn drop(&mut self) {
        let id = self.id;
        self.contracts.release_all(id);
    }
}

impl DirectedGraph for GraphStore {
    fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().copied().collect()
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    fn incident_edges(&self, vertex: VertexId) -> Vec<EdgeId> {
        let mut result: IndexSet<EdgeId> = IndexSet::new();
        if let Some(set) = self.outbound.get(&vertex) {
            result.extend(set.iter().copied());
        }
        if let Some(set) = self.inbound.get(&vertex) {
            result.extend(set.iter().copied());
        }
        result.into_iter().collect()
    }

    fn endpoints(&self, edge: EdgeId) -> Vec<VertexId> {
        match self.edges.get(&edge) {
            Some(entry) if entry.source == entry.target => vec![entry.source],
            Some(entry) => vec![entry.source, entry.target],
            None => Vec::new(),
        }
    }

    fn inbound(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.inbound
            .get(&vertex)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn outbound(&self, vertex: VertexId) -> Vec<EdgeId> {
        self.outbound
            .get(&vertex)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn source(&self, edge: EdgeId) -> Option<VertexId> {
        self.edges.get(&edge).map(|entry| entry.source)
    }

    fn target(&self, edge: EdgeId) -> Option<VertexId> {
        self.edges.get(&edge).map(|entry| entry.target)
    }

    fn weight(&self, edge: EdgeId) -> f64 {
        self.edges
            .get(&edge)
            .and_then(|entry| entry.weight)
            .unwrap_or(DEFAULT_WEIGHT)
    }
}
