//! Pluggable validators consulted before every store mutation.
//!
//! A [`Contract`] is wrapped in a [`ContractHandle`] and registered with a
//! store through [`GraphStore::add_contract`](crate::graph::GraphStore::add_contract).
//! A handle is bound to at most one store at a time.

pub mod builtin;
pub mod pipeline;

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::graph::GraphStore;
use crate::types::{Edge, EdgeId, GraphError, GraphResult, StoreId, Vertex, VertexId};

pub use builtin::{AcyclicContract, EndpointMembershipContract, OneEdgeContract};
pub use pipeline::ContractPipeline;

/// Reason a contract gives for refusing a mutation or a store state.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct Violation {
    pub reason: String,
}

impl Violation {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Result returned by contract hooks.
pub type Verdict = Result<(), Violation>;

/// A mutation offered to the contracts of a store.
#[derive(Debug, Clone, Copy)]
pub enum Mutation<'a> {
    AddVertex(&'a Vertex),
    RemoveVertex(VertexId),
    AddEdge {
        edge: &'a Edge,
        source: VertexId,
        target: VertexId,
    },
    RemoveEdge(EdgeId),
}

impl Mutation<'_> {
    /// Operation name used in errors and logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::AddVertex(_) => "add_vertex",
            Self::RemoveVertex(_) => "remove_vertex",
            Self::AddEdge { .. } => "add_edge",
            Self::RemoveEdge(_) => "remove_edge",
        }
    }
}

impl fmt::Display for Mutation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddVertex(v) => write!(f, "add_vertex({})", v.id),
            Self::RemoveVertex(id) => write!(f, "remove_vertex({id})"),
            Self::AddEdge {
                edge,
                source,
                target,
            } => write!(f, "add_edge({}: {source} -> {target})", edge.id),
            Self::RemoveEdge(id) => write!(f, "remove_edge({id})"),
        }
    }
}

/// A validator that can veto mutations of the store it is bound to.
///
/// Hooks see the store as it is *before* the mutation and only get shared
/// access to it. Every hook accepts by default.
pub trait Contract {
    /// Name used in errors and logs.
    fn name(&self) -> &str;

    /// Check the whole store. Runs once when the contract is added.
    fn verify(&self, graph: &GraphStore) -> Verdict;

    fn add_vertex(&self, _graph: &GraphStore, _vertex: &Vertex) -> Verdict {
        Ok(())
    }

    fn remove_vertex(&self, _graph: &GraphStore, _vertex: VertexId) -> Verdict {
        Ok(())
    }

    fn add_edge(
        &self,
        _graph: &GraphStore,
        _edge: &Edge,
        _source: VertexId,
        _target: VertexId,
    ) -> Verdict {
        Ok(())
    }

    fn remove_edge(&self, _graph: &GraphStore, _edge: EdgeId) -> Verdict {
        Ok(())
    }

    /// Called after a mutation was applied, with the store's new state.
    fn applied(&mut self, _graph: &GraphStore, _mutation: &Mutation<'_>) {}
}

struct ContractCell {
    name: String,
    bound_to: Cell<Option<StoreId>>,
    contract: RefCell<Box<dyn Contract>>,
}

/// Shared handle to a contract. Clones refer to the same contract and binding.
#[derive(Clone)]
pub struct ContractHandle(Rc<ContractCell>);

impl ContractHandle {
    pub fn new<C: Contract + 'static>(contract: C) -> Self {
        Self(Rc::new(ContractCell {
            name: contract.name().to_string(),
            bound_to: Cell::new(None),
            contract: RefCell::new(Box::new(contract)),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The store this contract is currently verifying, if any.
    pub fn bound_store(&self) -> Option<StoreId> {
        self.0.bound_to.get()
    }

    /// Borrow the contract to inspect its state.
    ///
    /// While the borrow is held, mutations still go through but the contract
    /// misses their [`Contract::applied`] notifications.
    pub fn borrow(&self) -> Ref<'_, Box<dyn Contract>> {
        self.0.contract.borrow()
    }

    /// Whether both handles refer to the same contract.
    pub fn same_as(&self, other: &ContractHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn bind(&self, store: StoreId) -> GraphResult<()> {
        if let Some(current) = self.0.bound_to.get() {
            return Err(GraphError::Reentry {
                contract: self.0.name.clone(),
                store: current,
            });
        }
        self.0.bound_to.set(Some(store));
        Ok(())
    }

    pub(crate) fn release(&self, store: StoreId) {
        if self.0.bound_to.get() == Some(store) {
            self.0.bound_to.set(None);
        }
    }

    pub(crate) fn verify(&self, graph: &GraphStore) -> Verdict {
        self.0.contract.borrow().verify(graph)
    }

    pub(crate) fn check(&self, graph: &GraphStore, mutation: &Mutation<'_>) -> Verdict {
        let contract = self.0.contract.borrow();
        match *mutation {
            Mutation::AddVertex(vertex) => contract.add_vertex(graph, vertex),
            Mutation::RemoveVertex(vertex) => contract.remove_vertex(graph, vertex),
            Mutation::AddEdge {
                edge,
                source,
                target,
            } => contract.add_edge(graph, edge, source, target),
            Mutation::RemoveEdge(edge) => contract.remove_edge(graph, edge),
        }
    }

    /// Skips the notification while the contract is borrowed through [`borrow`](Self::borrow).
    pub(crate) fn applied(&self, graph: &GraphStore, mutation: &Mutation<'_>) {
        match self.0.contract.try_borrow_mut() {
            Ok(mut contract) => contract.applied(graph, mutation),
            Err(_) => log::warn!(
                "Contract '{}' is borrowed; skipped notification for {}",
                self.0.name,
                mutation
            ),
        }
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("name", &self.0.name)
            .field("bound_to", &self.0.bound_to.get())
            .finish()
    }
}
