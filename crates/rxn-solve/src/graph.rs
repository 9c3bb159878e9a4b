//! Completed, rule-valid assignments of a topology.

use std::sync::Arc;

use rxn_core::{EdgeId, NodeId};
use rxn_qn::{EdgeState, NodeProperties};
use rxn_topology::Topology;
use serde::{Deserialize, Serialize};

/// Deterministic sort key of a solution: problem set, then branch choices in
/// enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SolutionKey {
    /// Index of the problem set the solution came from.
    pub problem_index: usize,
    /// Ordinal of the chosen branch at every search step.
    pub path: Vec<u32>,
}

/// A topology with a complete particle and quantum-number assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct StateTransitionGraph {
    topology_index: usize,
    topology: Arc<Topology>,
    edges: Vec<EdgeState>,
    nodes: Vec<NodeProperties>,
    key: SolutionKey,
}

impl StateTransitionGraph {
    pub(crate) fn new(
        topology_index: usize,
        topology: Arc<Topology>,
        edges: Vec<EdgeState>,
        nodes: Vec<NodeProperties>,
        key: SolutionKey,
    ) -> Self {
        Self {
            topology_index,
            topology,
            edges,
            nodes,
            key,
        }
    }

    /// Index of the topology within the manager's topology list.
    pub fn topology_index(&self) -> usize {
        self.topology_index
    }

    /// Graph skeleton.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Shared handle to the skeleton.
    pub fn topology_arc(&self) -> &Arc<Topology> {
        &self.topology
    }

    /// Sort key assigned by the solver.
    pub fn key(&self) -> &SolutionKey {
        &self.key
    }

    /// State of an edge.
    pub fn edge_state(&self, edge: EdgeId) -> Option<&EdgeState> {
        self.edges.get(edge.index())
    }

    /// All edge states with their identifiers.
    pub fn edge_states(&self) -> impl ExactSizeIterator<Item = (EdgeId, &EdgeState)> + '_ {
        self.topology.edge_ids().zip(self.edges.iter())
    }

    /// Properties of a node.
    pub fn node_properties(&self, node: NodeId) -> Option<&NodeProperties> {
        self.nodes.get(node.index())
    }

    /// All node properties with their identifiers.
    pub fn node_properties_iter(&self) -> impl ExactSizeIterator<Item = (NodeId, &NodeProperties)> + '_ {
        self.topology.node_ids().zip(self.nodes.iter())
    }

    /// Product of the node interaction strengths.
    pub fn strength(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|props| props.interaction_type)
            .map(|interaction| interaction.strength())
            .product()
    }

    /// Names of the particles on intermediate edges, in edge order.
    pub fn intermediate_particle_names(&self) -> Vec<&str> {
        self.topology
            .intermediate_edges()
            .into_iter()
            .filter_map(|edge| self.edge_state(edge))
            .filter_map(EdgeState::particle_name)
            .collect()
    }
}
