//! Contracts for common structural rules.

use std::collections::HashSet;

use crate::algo::is_reachable;
use crate::graph::{DirectedGraph, GraphStore, TraversalDirection};
use crate::types::{Edge, VertexId};

use super::{Contract, Verdict, Violation};

/// Rejects any edge that would close a directed cycle, self-loops included.
#[derive(Debug, Default)]
pub struct AcyclicContract;

impl AcyclicContract {
    pub fn new() -> Self {
        Self
    }
}

fn closes_cycle(graph: &GraphStore, source: VertexId, target: VertexId) -> bool {
    source == target || is_reachable(graph, target, source, TraversalDirection::Forward)
}

impl Contract for AcyclicContract {
    fn name(&self) -> &str {
        "acyclic"
    }

    fn verify(&self, graph: &GraphStore) -> Verdict {
        for edge in graph.edge_ids() {
            let (Some(source), Some(target)) = (graph.source(edge), graph.target(edge)) else {
                continue;
            };
            if source == target {
                return Err(Violation::new(format!("edge {edge} is a self-loop on {source}")));
            }
            if is_reachable(graph, target, source, TraversalDirection::Forward) {
                return Err(Violation::new(format!(
                    "edge {edge} {source} -> {target} lies on a cycle"
                )));
            }
        }
        Ok(())
    }

    fn add_edge(
        &self,
        graph: &GraphStore,
        edge: &Edge,
        source: VertexId,
        target: VertexId,
    ) -> Verdict {
        if closes_cycle(graph, source, target) {
            return Err(Violation::new(format!(
                "edge {} {source} -> {target} would close a cycle",
                edge.id
            )));
        }
        Ok(())
    }
}

/// Allows at most one edge per ordered (source, target) pair.
#[derive(Debug, Default)]
pub struct OneEdgeContract;

impl OneEdgeContract {
    pub fn new() -> Self {
        Self
    }
}

impl Contract for OneEdgeContract {
    fn name(&self) -> &str {
        "one-edge"
    }

    fn verify(&self, graph: &GraphStore) -> Verdict {
        let mut seen: HashSet<(VertexId, VertexId)> = HashSet::new();
        for edge in graph.edge_ids() {
            let (Some(source), Some(target)) = (graph.source(edge), graph.target(edge)) else {
                continue;
            };
            if !seen.insert((source, target)) {
                return Err(Violation::new(format!(
                    "more than one edge from {source} to {target}"
                )));
            }
        }
        Ok(())
    }

    fn add_edge(
        &self,
        graph: &GraphStore,
        edge: &Edge,
        source: VertexId,
        target: VertexId,
    ) -> Verdict {
        let parallel = graph
            .outbound(source)
            .into_iter()
            .find(|&existing| graph.target(existing) == Some(target));
        match parallel {
            Some(existing) => Err(Violation::new(format!(
                "edge {} duplicates {existing} from {source} to {target}",
                edge.id
            ))),
            None => Ok(()),
        }
    }
}

/// Requires both endpoints of every edge to be member vertices.
#[derive(Debug, Default)]
pub struct EndpointMembershipContract;

impl EndpointMembershipContract {
    pub fn new() -> Self {
        Self
    }
}

impl Contract for EndpointMembershipContract {
    fn name(&self) -> &str {
        "endpoint-membership"
    }

    fn verify(&self, graph: &GraphStore) -> Verdict {
        for edge in graph.edge_ids() {
            for endpoint in graph.endpoints(edge) {
                if !graph.contains_vertex(endpoint) {
                    return Err(Violation::new(format!(
                        "edge {edge} references non-member vertex {endpoint}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn add_edge(
        &self,
        graph: &GraphStore,
        edge: &Edge,
        source: VertexId,
        target: VertexId,
    ) -> Verdict {
        for endpoint in [source, target] {
            if !graph.contains_vertex(endpoint) {
                return Err(Violation::new(format!(
                    "edge {} references non-member vertex {endpoint}",
                    edge.id
                )));
            }
        }
        Ok(())
    }
}
