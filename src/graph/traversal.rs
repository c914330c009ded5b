//! Depth-first traversal dispatched over any [`DirectedGraph`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{EdgeId, VertexId};

use super::DirectedGraph;

/// Direction for graph traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDirection {
    /// Follow outgoing edges (source -> target).
    Forward,
    /// Follow incoming edges (target <- source).
    Backward,
    /// Follow edges in both directions.
    #[default]
    Both,
}

/// What the traversal should do after a handler callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    /// Keep going.
    Continue,
    /// Do not expand this vertex or edge.
    Skip,
    /// Stop the whole traversal.
    Abort,
}

/// Callbacks invoked by [`depth_first`]. Every callback continues by default.
pub trait VisitHandler {
    type Output;

    /// A vertex is reached for the first time.
    fn discover_vertex(&mut self, _vertex: VertexId) -> VisitState {
        VisitState::Continue
    }

    /// An edge leads from `head` to the not yet visited `tail`.
    fn discover_edge(&mut self, _head: VertexId, _edge: EdgeId, _tail: VertexId) -> VisitState {
        VisitState::Continue
    }

    /// Everything reachable through `edge` has been explored.
    fn finish_edge(&mut self, _head: VertexId, _edge: EdgeId, _tail: VertexId) -> VisitState {
        VisitState::Continue
    }

    /// Every neighbour of `vertex` has been explored.
    fn finish_vertex(&mut self, _vertex: VertexId) -> VisitState {
        VisitState::Continue
    }

    fn on_completed(self) -> Self::Output;
}

struct Frame {
    vertex: VertexId,
    via: Option<EdgeId>,
    neighbours: Vec<(EdgeId, VertexId)>,
    cursor: usize,
}

/// Edges leaving `vertex` in `direction`, paired with the vertex on the other side.
///
/// Outbound edges come first, then inbound edges, each in the graph's iteration order.
pub fn neighbours<G>(
    graph: &G,
    vertex: VertexId,
    direction: TraversalDirection,
) -> Vec<(EdgeId, VertexId)>
where
    G: DirectedGraph + ?Sized,
{
    let mut result = Vec::new();
    if direction != TraversalDirection::Backward {
        for edge in graph.outbound(vertex) {
            if let Some(target) = graph.target(edge) {
                result.push((edge, target));
            }
        }
    }
    if direction != TraversalDirection::Forward {
        for edge in graph.inbound(vertex) {
            if let Some(source) = graph.source(edge) {
                result.push((edge, source));
            }
        }
    }
    result
}

/// Depth-first traversal from `source`, feeding every event to `handler`.
///
/// The walk uses an explicit stack, so its depth is bounded only by memory.
/// Each vertex is discovered at most once.
pub fn depth_first<G, H>(
    graph: &G,
    source: VertexId,
    direction: TraversalDirection,
    mut handler: H,
) -> H::Output
where
    G: DirectedGraph + ?Sized,
    H: VisitHandler,
{
    let mut visited: HashSet<VertexId> = HashSet::new();
    visited.insert(source);

    match handler.discover_vertex(source) {
        VisitState::Continue => {}
        VisitState::Skip | VisitState::Abort => return handler.on_completed(),
    }

    let mut stack = vec![Frame {
        vertex: source,
        via: None,
        neighbours: neighbours(graph, source, direction),
        cursor: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        let step = frame.neighbours.get(frame.cursor).copied();
        let head = frame.vertex;

        let Some((edge, tail)) = step else {
            // Exhausted: unwind one level.
            let via = frame.via;
            stack.pop();
            if handler.finish_vertex(head) == VisitState::Abort {
                break;
            }
            if let (Some(edge), Some(parent)) = (via, stack.last()) {
                if handler.finish_edge(parent.vertex, edge, head) == VisitState::Abort {
                    break;
                }
            }
            continue;
        };
        frame.cursor += 1;

        if visited.contains(&tail) {
            continue;
        }
        match handler.discover_edge(head, edge, tail) {
            VisitState::Continue => {}
            VisitState::Skip => continue,
            VisitState::Abort => break,
        }

        visited.insert(tail);
        log::trace!("dfs: {head} -[{edge}]-> {tail}");
        match handler.discover_vertex(tail) {
            VisitState::Continue => stack.push(Frame {
                vertex: tail,
                via: Some(edge),
                neighbours: neighbours(graph, tail, direction),
                cursor: 0,
            }),
            VisitState::Skip => {
                if handler.finish_edge(head, edge, tail) == VisitState::Abort {
                    break;
                }
            }
            VisitState::Abort => break,
        }
    }

    handler.on_completed()
}

/// Collects vertices in discovery order.
#[derive(Debug, Default)]
pub struct VertexCollector {
    visited: Vec<VertexId>,
}

impl VisitHandler for VertexCollector {
    type Output = Vec<VertexId>;

    fn discover_vertex(&mut self, vertex: VertexId) -> VisitState {
        self.visited.push(vertex);
        VisitState::Continue
    }

    fn on_completed(self) -> Self::Output {
        self.visited
    }
}
