//! Ranking of solutions by the product of their node interaction strengths.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use rxn_solve::StateTransitionGraph;
use serde::{Deserialize, Serialize};

/// Total order over strength products.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InteractionStrength(pub f64);

impl InteractionStrength {
    /// Strength of a solution graph.
    pub fn of(graph: &StateTransitionGraph) -> Self {
        Self(graph.strength())
    }

    /// Returns the raw value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for InteractionStrength {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for InteractionStrength {}

impl PartialOrd for InteractionStrength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InteractionStrength {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Display for InteractionStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Solutions sharing one strength value.
#[derive(Debug, Clone)]
pub struct StrengthGroup {
    /// Common strength of the group.
    pub strength: InteractionStrength,
    /// Graphs in solution key order.
    pub graphs: Vec<StateTransitionGraph>,
}

/// Groups solutions by strength, strongest group first.
pub fn group_by_strength(graphs: &[StateTransitionGraph]) -> Vec<StrengthGroup> {
    let mut groups: Vec<StrengthGroup> = Vec::new();
    let mut sorted: Vec<&StateTransitionGraph> = graphs.iter().collect();
    sorted.sort_by(|a, b| {
        InteractionStrength::of(b)
            .cmp(&InteractionStrength::of(a))
            .then_with(|| a.key().cmp(b.key()))
    });
    for graph in sorted {
        let strength = InteractionStrength::of(graph);
        match groups.last_mut() {
            Some(group) if group.strength == strength => group.graphs.push(graph.clone()),
            _ => groups.push(StrengthGroup {
                strength,
                graphs: vec![graph.clone()],
            }),
        }
    }
    groups
}
