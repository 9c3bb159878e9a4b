#![deny(missing_docs)]
#![doc = "Quantum-number domain: the quantum numbers tracked on edges and nodes, their value domains, and the per-branch edge and node states."]

mod domain;
mod numbers;
mod state;

pub use domain::{EdgeQnDomains, NodeQnDomains};
pub use numbers::{EdgeQn, EdgeQuantumNumbers, NodeQn, NodeQuantumNumbers, QnValue};
pub use state::{EdgeState, NodeProperties};
