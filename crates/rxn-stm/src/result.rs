use std::collections::BTreeSet;

use rxn_equiv::{group_by_strength, StrengthGroup};
use rxn_solve::{Diagnostic, FormalismType, StateTransitionGraph};

/// Outcome of [`crate::StateTransitionManager::find_solutions`].
#[derive(Debug, Clone)]
pub struct ReactionResult {
    /// Distinct solutions sorted by topology, problem set and enumeration order.
    pub solutions: Vec<StateTransitionGraph>,
    /// Why topologies produced nothing, plus timeouts.
    pub diagnostics: Vec<Diagnostic>,
    /// Topologies whose search was cancelled or timed out.
    pub incomplete_topologies: BTreeSet<usize>,
    /// Problem sets of weaker strength groups left unsolved in fast mode.
    pub skipped_problem_sets: usize,
    /// Rules forbidding the direct transition; only computed when no solution exists.
    pub violated_rules: BTreeSet<String>,
    /// Formalism the solutions were built for.
    pub formalism: FormalismType,
}

impl ReactionResult {
    /// Number of solutions.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// Returns `true` when nothing survived.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Returns `true` when every topology was searched exhaustively.
    pub fn is_complete(&self) -> bool {
        self.incomplete_topologies.is_empty()
    }

    /// Sorted names of every particle appearing on an intermediate edge.
    pub fn intermediate_particle_names(&self) -> BTreeSet<String> {
        self.solutions
            .iter()
            .flat_map(|graph| graph.intermediate_particle_names())
            .map(str::to_string)
            .collect()
    }

    /// Solutions grouped by interaction strength, strongest first.
    pub fn group_by_strength(&self) -> Vec<StrengthGroup> {
        group_by_strength(&self.solutions)
    }

    /// The dominant strength group, if any solution exists.
    pub fn strongest_group(&self) -> Option<StrengthGroup> {
        self.group_by_strength().into_iter().next()
    }

    /// Diagnostics of one topology.
    pub fn diagnostics_for(&self, topology_index: usize) -> impl Iterator<Item = &Diagnostic> + '_ {
        self.diagnostics
            .iter()
            .filter(move |entry| entry.topology_index == topology_index)
    }
}
