//! Connected-component partitioning on top of the depth-first traversal.

use std::collections::{HashSet, VecDeque};

use crate::graph::{depth_first, DirectedGraph, TraversalDirection, VisitHandler, VisitState};
use crate::types::VertexId;

/// Collects one component, claiming each vertex it keeps.
///
/// Vertices outside the candidate set are never expanded, so the component
/// is one of the subgraph induced by the candidates.
struct ComponentCollector<'a> {
    candidates: &'a HashSet<VertexId>,
    claimed: &'a mut HashSet<VertexId>,
    component: Vec<VertexId>,
}

impl VisitHandler for ComponentCollector<'_> {
    type Output = Vec<VertexId>;

    fn discover_vertex(&mut self, vertex: VertexId) -> VisitState {
        if !self.candidates.contains(&vertex) || !self.claimed.insert(vertex) {
            return VisitState::Skip;
        }
        self.component.push(vertex);
        VisitState::Continue
    }

    fn on_completed(self) -> Self::Output {
        self.component
    }
}

/// Partition `candidates` into maximal connected components, ignoring edge direction.
///
/// See [`connected_components_directed`].
pub fn connected_components<G, I>(graph: &G, candidates: I) -> Vec<Vec<VertexId>>
where
    G: DirectedGraph + ?Sized,
    I: IntoIterator<Item = VertexId>,
{
    connected_components_directed(graph, candidates, TraversalDirection::Both)
}

/// Partition `candidates` into components reachable under `direction`.
///
/// Candidates are seeded in iteration order; each seed that is not yet part
/// of a component starts a depth-first walk. Components are returned in
/// seed order, vertices within a component in discovery order. Every
/// candidate appears in exactly one component, duplicates in the input
/// included. An empty input yields no components.
pub fn connected_components_directed<G, I>(
    graph: &G,
    candidates: I,
    direction: TraversalDirection,
) -> Vec<Vec<VertexId>>
where
    G: DirectedGraph + ?Sized,
    I: IntoIterator<Item = VertexId>,
{
    let mut worklist: VecDeque<VertexId> = candidates.into_iter().collect();
    let included: HashSet<VertexId> = worklist.iter().copied().collect();
    let mut claimed: HashSet<VertexId> = HashSet::with_capacity(included.len());
    let mut components = Vec::new();

    while let Some(seed) = worklist.pop_front() {
        if claimed.contains(&seed) {
            continue;
        }
        let collector = ComponentCollector {
            candidates: &included,
            claimed: &mut claimed,
            component: Vec::new(),
        };
        components.push(depth_first(graph, seed, direction, collector));
    }

    log::debug!(
        "connectivity: {} candidate(s) in {} component(s)",
        included.len(),
        components.len()
    );
    components
}

struct ReachabilityProbe {
    goal: VertexId,
    found: bool,
}

impl VisitHandler for ReachabilityProbe {
    type Output = bool;

    fn discover_vertex(&mut self, vertex: VertexId) -> VisitState {
        if vertex == self.goal {
            self.found = true;
            return VisitState::Abort;
        }
        VisitState::Continue
    }

    fn on_completed(self) -> Self::Output {
        self.found
    }
}

/// Whether `to` can be reached from `from` under `direction`.
///
/// A vertex always reaches itself.
pub fn is_reachable<G>(
    graph: &G,
    from: VertexId,
    to: VertexId,
    direction: TraversalDirection,
) -> bool
where
    G: DirectedGraph + ?Sized,
{
    depth_first(
        graph,
        from,
        direction,
        ReachabilityProbe {
            goal: to,
            found: false,
        },
    )
}
