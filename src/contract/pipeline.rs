//! Ordered contract registry with a prepare/commit protocol.

use crate::graph::GraphStore;
use crate::types::{GraphError, GraphResult, StoreId};

use super::{ContractHandle, Mutation};

/// The contracts registered with one store, in registration order.
#[derive(Debug, Default)]
pub struct ContractPipeline {
    contracts: Vec<ContractHandle>,
}

impl ContractPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    /// Registered contract names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.contracts.iter().map(|c| c.name().to_string()).collect()
    }

    /// Bind `contract` to `graph` and verify it against the current state.
    ///
    /// A failed verification releases the binding again. The caller registers
    /// the contract with [`push`](Self::push) once this succeeds.
    pub(crate) fn admit(contract: &ContractHandle, graph: &GraphStore) -> GraphResult<()> {
        contract.bind(graph.id())?;
        if let Err(violation) = contract.verify(graph) {
            contract.release(graph.id());
            log::warn!(
                "Contract '{}' failed verification on {}: {}",
                contract.name(),
                graph.id(),
                violation
            );
            return Err(GraphError::VerificationFailed {
                contract: contract.name().to_string(),
                reason: violation.reason,
            });
        }
        log::debug!("Contract '{}' bound to {}", contract.name(), graph.id());
        Ok(())
    }

    pub(crate) fn push(&mut self, contract: ContractHandle) {
        self.contracts.push(contract);
    }

    /// Unregister `contract` and release its binding. Returns whether it was registered.
    pub(crate) fn unregister(&mut self, contract: &ContractHandle, store: StoreId) -> bool {
        match self.contracts.iter().position(|c| c.same_as(contract)) {
            Some(pos) => {
                let removed = self.contracts.remove(pos);
                removed.release(store);
                log::debug!("Contract '{}' released from {}", removed.name(), store);
                true
            }
            None => false,
        }
    }

    /// Offer every mutation to every contract, in registration order.
    ///
    /// Stops at the first rejection. Nothing has been applied at this point.
    pub(crate) fn prepare(
        &self,
        graph: &GraphStore,
        mutations: &[Mutation<'_>],
    ) -> GraphResult<()> {
        for mutation in mutations {
            for contract in &self.contracts {
                if let Err(violation) = contract.check(graph, mutation) {
                    log::warn!(
                        "Contract '{}' rejected {}: {}",
                        contract.name(),
                        mutation,
                        violation
                    );
                    return Err(GraphError::ContractViolation {
                        contract: contract.name().to_string(),
                        operation: mutation.operation(),
                        reason: violation.reason,
                    });
                }
            }
        }
        Ok(())
    }

    /// Notify every contract that `mutation` has been applied.
    pub(crate) fn commit(&self, graph: &GraphStore, mutation: &Mutation<'_>) {
        for contract in &self.contracts {
            contract.applied(graph, mutation);
        }
    }

    pub(crate) fn release_all(&mut self, store: StoreId) {
        for contract in self.contracts.drain(..) {
            contract.release(store);
        }
    }
}
