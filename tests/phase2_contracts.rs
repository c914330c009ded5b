//! Phase 2 tests: Contract binding and the validation pipeline.

use std::cell::RefCell;
use std::rc::Rc;

use weighted_digraph::contract::{
    AcyclicContract, Contract, ContractHandle, EndpointMembershipContract, Mutation,
    OneEdgeContract, Verdict, Violation,
};
use weighted_digraph::graph::{DirectedGraph, GraphStore};
use weighted_digraph::types::{Edge, EdgeId, GraphError, Vertex, VertexId};

// ==================== Helpers ====================

fn v(id: u64) -> VertexId {
    VertexId(id)
}

fn e(id: u64) -> EdgeId {
    EdgeId(id)
}

/// Accepts everything and records what it was asked and told.
struct Recorder {
    name: String,
    log: Rc<RefCell<Vec<String>>>,
}

impl Recorder {
    fn new(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            name: name.to_string(),
            log: Rc::clone(log),
        }
    }
}

impl Contract for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn verify(&self, _graph: &GraphStore) -> Verdict {
        self.log.borrow_mut().push(format!("{}:verify", self.name));
        Ok(())
    }

    fn add_vertex(&self, _graph: &GraphStore, vertex: &Vertex) -> Verdict {
        self.log
            .borrow_mut()
            .push(format!("{}:add_vertex:{}", self.name, vertex.id));
        Ok(())
    }

    fn add_edge(&self, graph: &GraphStore, edge: &Edge, _s: VertexId, _t: VertexId) -> Verdict {
        // Hooks see the store before the mutation.
        assert!(!graph.contains_edge(edge.id));
        self.log
            .borrow_mut()
            .push(format!("{}:add_edge:{}", self.name, edge.id));
        Ok(())
    }

    fn remove_edge(&self, _graph: &GraphStore, edge: EdgeId) -> Verdict {
        self.log
            .borrow_mut()
            .push(format!("{}:remove_edge:{}", self.name, edge));
        Ok(())
    }

    fn remove_vertex(&self, _graph: &GraphStore, vertex: VertexId) -> Verdict {
        self.log
            .borrow_mut()
            .push(format!("{}:remove_vertex:{}", self.name, vertex));
        Ok(())
    }

    fn applied(&mut self, _graph: &GraphStore, mutation: &Mutation<'_>) {
        self.log
            .borrow_mut()
            .push(format!("{}:applied:{}", self.name, mutation));
    }
}

/// Rejects every edge addition.
struct NoEdges;

impl Contract for NoEdges {
    fn name(&self) -> &str {
        "no-edges"
    }

    fn verify(&self, graph: &GraphStore) -> Verdict {
        if graph.edge_count() > 0 {
            return Err(Violation::new("graph already has edges"));
        }
        Ok(())
    }

    fn add_edge(&self, _graph: &GraphStore, _edge: &Edge, _s: VertexId, _t: VertexId) -> Verdict {
        Err(Violation::new("edges are not allowed"))
    }
}

/// Rejects removal of one particular edge.
struct Pinned(EdgeId);

impl Contract for Pinned {
    fn name(&self) -> &str {
        "pinned"
    }

    fn verify(&self, _graph: &GraphStore) -> Verdict {
        Ok(())
    }

    fn remove_edge(&self, _graph: &GraphStore, edge: EdgeId) -> Verdict {
        if edge == self.0 {
            return Err(Violation::new(format!("{edge} is pinned")));
        }
        Ok(())
    }
}

/// Rejects every vertex addition and removal.
struct Frozen;

impl Contract for Frozen {
    fn name(&self) -> &str {
        "frozen"
    }

    fn verify(&self, _graph: &GraphStore) -> Verdict {
        Ok(())
    }

    fn add_vertex(&self, _graph: &GraphStore, vertex: &Vertex) -> Verdict {
        Err(Violation::new(format!("cannot add {}", vertex.id)))
    }

    fn remove_vertex(&self, _graph: &GraphStore, vertex: VertexId) -> Verdict {
        Err(Violation::new(format!("cannot remove {vertex}")))
    }
}

// ==================== Binding Tests ====================

#[test]
fn test_add_contract_verifies_first() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut graph = GraphStore::new();
    let handle = ContractHandle::new(Recorder::new("r", &log));

    graph.add_contract(handle.clone()).unwrap();

    assert_eq!(*log.borrow(), vec!["r:verify".to_string()]);
    assert_eq!(handle.bound_store(), Some(graph.id()));
    assert_eq!(graph.contracts().names(), vec!["r".to_string()]);
}

#[test]
fn test_rebinding_to_second_store_fails() {
    let mut first = GraphStore::new();
    let mut second = GraphStore::new();
    let handle = ContractHandle::new(AcyclicContract::new());

    first.add_contract(handle.clone()).unwrap();
    match second.add_contract(handle.clone()).unwrap_err() {
        GraphError::Reentry { contract, store } => {
            assert_eq!(contract, "acyclic");
            assert_eq!(store, first.id());
        }
        other => panic!("Expected Reentry, got {:?}", other),
    }
    assert!(second.contracts().is_empty());
    assert_eq!(handle.bound_store(), Some(first.id()));
    assert!(GraphError::Reentry {
        contract: "acyclic".into(),
        store: first.id()
    }
    .to_string()
    .contains("re-entry not allowed"));
}

#[test]
fn test_rebinding_to_same_store_fails() {
    let mut graph = GraphStore::new();
    let handle = ContractHandle::new(OneEdgeContract::new());

    graph.add_contract(handle.clone()).unwrap();
    assert!(matches!(
        graph.add_contract(handle.clone()),
        Err(GraphError::Reentry { .. })
    ));
    assert_eq!(graph.contracts().len(), 1);
}

#[test]
fn test_remove_contract_releases_binding() {
    let mut first = GraphStore::new();
    let mut second = GraphStore::new();
    let handle = ContractHandle::new(AcyclicContract::new());

    first.add_contract(handle.clone()).unwrap();
    assert!(first.remove_contract(&handle));
    assert!(!first.remove_contract(&handle));
    assert_eq!(handle.bound_store(), None);

    second.add_contract(handle.clone()).unwrap();
    assert_eq!(handle.bound_store(), Some(second.id()));
}

#[test]
fn test_dropping_store_releases_binding() {
    let handle = ContractHandle::new(AcyclicContract::new());
    {
        let mut graph = GraphStore::new();
        graph.add_contract(handle.clone()).unwrap();
        assert!(handle.bound_store().is_some());
    }
    assert_eq!(handle.bound_store(), None);
}

#[test]
fn test_failed_verification_not_registered() {
    let mut graph = GraphStore::new();
    graph.add_edge(Edge::new(1), v(1), v(2)).unwrap();
    let handle = ContractHandle::new(NoEdges);

    match graph.add_contract(handle.clone()).unwrap_err() {
        GraphError::VerificationFailed { contract, reason } => {
            assert_eq!(contract, "no-edges");
            assert_eq!(reason, "graph already has edges");
        }
        other => panic!("Expected VerificationFailed, got {:?}", other),
    }
    assert!(graph.contracts().is_empty());
    assert_eq!(handle.bound_store(), None);
}

// ==================== Dispatch Tests ====================

#[test]
fn test_rejected_edge_leaves_store_unchanged() {
    let mut graph = GraphStore::new();
    graph.add_vertex(Vertex::new(1)).unwrap();
    graph.add_vertex(Vertex::new(2)).unwrap();
    graph.add_contract(ContractHandle::new(NoEdges)).unwrap();

    match graph.add_edge(Edge::new(1), v(1), v(2)).unwrap_err() {
        GraphError::ContractViolation {
            contract,
            operation,
            reason,
        } => {
            assert_eq!(contract, "no-edges");
            assert_eq!(operation, "add_edge");
            assert_eq!(reason, "edges are not allowed");
        }
        other => panic!("Expected ContractViolation, got {:?}", other),
    }
    assert!(graph.edge_ids().is_empty());
    assert!(graph.outbound(v(1)).is_empty());
    assert!(graph.inbound(v(2)).is_empty());
    assert_eq!(graph.source(e(1)), None);
}

#[test]
fn test_rejected_edge_removal_leaves_store_unchanged() {
    let mut graph = GraphStore::new();
    graph.add_vertex(Vertex::new(1)).unwrap();
    graph.add_vertex(Vertex::new(2)).unwrap();
    graph
        .add_edge(Edge::new(10).with_weight(2.5), v(1), v(2))
        .unwrap();
    graph.add_contract(ContractHandle::new(Pinned(e(10)))).unwrap();

    match graph.remove_edge(e(10)).unwrap_err() {
        GraphError::ContractViolation {
            contract,
            operation,
            ..
        } => {
            assert_eq!(contract, "pinned");
            assert_eq!(operation, "remove_edge");
        }
        other => panic!("Expected ContractViolation, got {:?}", other),
    }
    assert!(graph.contains_edge(e(10)));
    assert_eq!(graph.source(e(10)), Some(v(1)));
    assert_eq!(graph.target(e(10)), Some(v(2)));
    assert_eq!(graph.weight(e(10)), 2.5);
    assert_eq!(graph.outbound(v(1)), vec![e(10)]);
    assert_eq!(graph.inbound(v(2)), vec![e(10)]);
}

#[test]
fn test_rejected_vertex_removal_leaves_store_unchanged() {
    let mut graph = GraphStore::new();
    graph.add_vertex(Vertex::new(1)).unwrap();
    graph.add_vertex(Vertex::new(2)).unwrap();
    graph.add_contract(ContractHandle::new(Frozen)).unwrap();

    match graph.remove_vertex(v(2)).unwrap_err() {
        GraphError::ContractViolation {
            contract,
            operation,
            reason,
        } => {
            assert_eq!(contract, "frozen");
            assert_eq!(operation, "remove_vertex");
            assert_eq!(reason, "cannot remove v2");
        }
        other => panic!("Expected ContractViolation, got {:?}", other),
    }
    assert_eq!(graph.vertex_ids(), vec![v(1), v(2)]);
    assert_eq!(graph.first_vertex(), Some(v(1)));
}

#[test]
fn test_rejected_first_vertex_leaves_store_empty() {
    let mut graph = GraphStore::new();
    graph.add_contract(ContractHandle::new(Frozen)).unwrap();

    match graph.add_vertex(Vertex::new(1)).unwrap_err() {
        GraphError::ContractViolation { operation, .. } => {
            assert_eq!(operation, "add_vertex");
        }
        other => panic!("Expected ContractViolation, got {:?}", other),
    }
    assert_eq!(graph.vertex_count(), 0);
    assert!(!graph.contains_vertex(v(1)));
    assert_eq!(graph.first_vertex(), None);
}

#[test]
fn test_borrowed_contract_skips_notification() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut graph = GraphStore::new();
    let first = ContractHandle::new(Recorder::new("a", &log));
    graph.add_contract(first.clone()).unwrap();
    graph
        .add_contract(ContractHandle::new(Recorder::new("b", &log)))
        .unwrap();
    log.borrow_mut().clear();

    {
        let peek = first.borrow();
        assert_eq!(peek.name(), "a");
        graph.add_vertex(Vertex::new(1)).unwrap();
    }
    assert!(graph.contains_vertex(v(1)));
    assert_eq!(
        *log.borrow(),
        vec![
            "a:add_vertex:v1".to_string(),
            "b:add_vertex:v1".to_string(),
            "b:applied:add_vertex(v1)".to_string(),
        ]
    );

    log.borrow_mut().clear();
    graph.add_vertex(Vertex::new(2)).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            "a:add_vertex:v2".to_string(),
            "b:add_vertex:v2".to_string(),
            "a:applied:add_vertex(v2)".to_string(),
            "b:applied:add_vertex(v2)".to_string(),
        ]
    );
}

#[test]
fn test_contracts_consulted_in_registration_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut graph = GraphStore::new();
    graph
        .add_contract(ContractHandle::new(Recorder::new("a", &log)))
        .unwrap();
    graph
        .add_contract(ContractHandle::new(Recorder::new("b", &log)))
        .unwrap();
    log.borrow_mut().clear();

    graph.add_vertex(Vertex::new(1)).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "a:add_vertex:v1".to_string(),
            "b:add_vertex:v1".to_string(),
            "a:applied:add_vertex(v1)".to_string(),
            "b:applied:add_vertex(v1)".to_string(),
        ]
    );
}

#[test]
fn test_later_rejection_skips_commit() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut graph = GraphStore::new();
    graph
        .add_contract(ContractHandle::new(Recorder::new("a", &log)))
        .unwrap();
    graph.add_contract(ContractHandle::new(NoEdges)).unwrap();
    log.borrow_mut().clear();

    assert!(graph.add_edge(Edge::new(3), v(1), v(2)).is_err());

    // "a" accepted, but nothing was applied.
    assert_eq!(*log.borrow(), vec!["a:add_edge:e3".to_string()]);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_cascade_offers_every_removal() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut graph = GraphStore::new();
    graph.add_vertex(Vertex::new(1)).unwrap();
    graph.add_vertex(Vertex::new(2)).unwrap();
    graph.add_edge(Edge::new(10), v(1), v(2)).unwrap();
    graph.add_edge(Edge::new(11), v(2), v(1)).unwrap();
    graph
        .add_contract(ContractHandle::new(Recorder::new("r", &log)))
        .unwrap();
    log.borrow_mut().clear();

    graph.remove_vertex(v(1)).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "r:remove_edge:e10".to_string(),
            "r:remove_edge:e11".to_string(),
            "r:remove_vertex:v1".to_string(),
            "r:applied:remove_edge(e10)".to_string(),
            "r:applied:remove_edge(e11)".to_string(),
            "r:applied:remove_vertex(v1)".to_string(),
        ]
    );
}

#[test]
fn test_cascade_is_atomic() {
    let mut graph = GraphStore::new();
    graph.add_vertex(Vertex::new(1)).unwrap();
    graph.add_vertex(Vertex::new(2)).unwrap();
    graph.add_vertex(Vertex::new(3)).unwrap();
    graph.add_edge(Edge::new(10), v(1), v(2)).unwrap();
    graph.add_edge(Edge::new(11), v(3), v(1)).unwrap();
    graph.add_contract(ContractHandle::new(Pinned(e(11)))).unwrap();

    let err = graph.remove_vertex(v(1)).unwrap_err();
    assert!(matches!(err, GraphError::ContractViolation { .. }));

    // The first incident edge was not removed either.
    assert!(graph.contains_vertex(v(1)));
    assert!(graph.contains_edge(e(10)));
    assert!(graph.contains_edge(e(11)));
    assert_eq!(graph.outbound(v(1)), vec![e(10)]);
}

// ==================== Built-in Contract Tests ====================

#[test]
fn test_acyclic_contract() {
    let mut graph = GraphStore::new();
    graph
        .add_contract(ContractHandle::new(AcyclicContract::new()))
        .unwrap();

    graph.add_edge(Edge::new(1), v(1), v(2)).unwrap();
    graph.add_edge(Edge::new(2), v(2), v(3)).unwrap();
    graph.add_edge(Edge::new(3), v(1), v(3)).unwrap();

    assert!(matches!(
        graph.add_edge(Edge::new(4), v(3), v(1)),
        Err(GraphError::ContractViolation { .. })
    ));
    assert!(matches!(
        graph.add_edge(Edge::new(5), v(2), v(2)),
        Err(GraphError::ContractViolation { .. })
    ));
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_acyclic_verify_rejects_cycle() {
    let mut graph = GraphStore::new();
    graph.add_edge(Edge::new(1), v(1), v(2)).unwrap();
    graph.add_edge(Edge::new(2), v(2), v(1)).unwrap();

    assert!(matches!(
        graph.add_contract(ContractHandle::new(AcyclicContract::new())),
        Err(GraphError::VerificationFailed { .. })
    ));
}

#[test]
fn test_one_edge_contract() {
    let mut graph = GraphStore::new();
    graph
        .add_contract(ContractHandle::new(OneEdgeContract::new()))
        .unwrap();

    graph.add_edge(Edge::new(1), v(1), v(2)).unwrap();
    graph.add_edge(Edge::new(2), v(2), v(1)).unwrap();
    assert!(graph.add_edge(Edge::new(3), v(1), v(2)).is_err());

    graph.remove_edge(e(1)).unwrap();
    graph.add_edge(Edge::new(3), v(1), v(2)).unwrap();
}

#[test]
fn test_endpoint_membership_contract() {
    let mut graph = GraphStore::new();
    graph.add_vertex(Vertex::new(1)).unwrap();
    graph
        .add_contract(ContractHandle::new(EndpointMembershipContract::new()))
        .unwrap();

    assert!(graph.add_edge(Edge::new(1), v(1), v(2)).is_err());
    graph.add_vertex(Vertex::new(2)).unwrap();
    graph.add_edge(Edge::new(1), v(1), v(2)).unwrap();
}

#[test]
fn test_endpoint_membership_verify() {
    let mut graph = GraphStore::new();
    graph.add_edge(Edge::new(1), v(1), v(2)).unwrap();

    assert!(matches!(
        graph.add_contract(ContractHandle::new(EndpointMembershipContract::new())),
        Err(GraphError::VerificationFailed { .. })
    ));
}
