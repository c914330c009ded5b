//! Algorithms that read a graph through [`DirectedGraph`](crate::graph::DirectedGraph).

pub mod connectivity;

pub use connectivity::{connected_components, connected_components_directed, is_reachable};
