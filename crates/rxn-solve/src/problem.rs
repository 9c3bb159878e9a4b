//! Problem sets: one topology, its initial facts and the settings of every node.

use std::collections::BTreeMap;
use std::sync::Arc;

use rxn_core::{spin_projections, EdgeId, ErrorInfo, HalfInteger, NodeId, ParticleRecord, RxnError};
use rxn_qn::EdgeState;
use rxn_topology::Topology;

use crate::formalism::FormalismType;
use crate::settings::InteractionSettings;

/// Fully specified states of the external edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitialFacts {
    /// States keyed by external edge.
    pub edges: BTreeMap<EdgeId, EdgeState>,
}

impl InitialFacts {
    /// Creates empty facts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a state to an edge, replacing any previous one.
    pub fn insert(&mut self, edge: EdgeId, state: EdgeState) {
        self.edges.insert(edge, state);
    }

    /// Returns the state of an edge.
    pub fn get(&self, edge: EdgeId) -> Option<&EdgeState> {
        self.edges.get(&edge)
    }

    /// Sorted particle names attached to the given edges.
    pub fn particle_names(&self, edges: &[EdgeId]) -> Vec<String> {
        let mut names: Vec<String> = edges
            .iter()
            .filter_map(|edge| self.get(*edge))
            .filter_map(|state| state.particle_name().map(str::to_string))
            .collect();
        names.sort();
        names
    }
}

/// Everything the solver needs for one search.
///
/// Settings may be edited before solving; the topology and candidates are shared
/// read-only across problem sets.
#[derive(Debug, Clone)]
pub struct ProblemSet {
    /// Index of the topology within the manager's topology list.
    pub topology_index: usize,
    /// Graph skeleton.
    pub topology: Arc<Topology>,
    /// States of the external edges.
    pub facts: InitialFacts,
    /// Settings per node; one entry for every node of the topology.
    pub node_settings: BTreeMap<NodeId, InteractionSettings>,
    /// Candidate particles for intermediate edges, sorted by name.
    pub candidates: Arc<Vec<Arc<ParticleRecord>>>,
    /// Formalism the solutions are built for.
    pub formalism: FormalismType,
}

impl ProblemSet {
    /// Product of the node interaction strengths.
    pub fn strength(&self) -> f64 {
        self.node_settings.values().map(InteractionSettings::strength).product()
    }

    /// Returns the settings of a node.
    pub fn settings(&self, node: NodeId) -> Result<&InteractionSettings, RxnError> {
        self.node_settings.get(&node).ok_or_else(|| {
            RxnError::Config(
                ErrorInfo::new("missing-node-settings", "node has no interaction settings")
                    .with_context("topology", self.topology_index.to_string())
                    .with_context("node", node.to_string()),
            )
        })
    }
}

/// Spin projections a particle is enumerated with when none are given.
///
/// Massless particles with non-zero spin have no zero helicity.
pub fn default_spin_projections(record: &ParticleRecord) -> Vec<HalfInteger> {
    let projections = spin_projections(record.spin);
    if record.is_massless() && record.spin != HalfInteger::ZERO {
        projections
            .into_iter()
            .filter(|projection| *projection != HalfInteger::ZERO)
            .collect()
    } else {
        projections
    }
}
