//! Interaction types a node can carry given the particles already known on its edges.

use std::collections::BTreeSet;

use rxn_core::InteractionType;
use rxn_qn::EdgeState;
use serde::{Deserialize, Serialize};

/// Narrows the interaction types of a node from its known edge states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionDeterminator {
    /// Photons do not couple strongly.
    GammaCheck,
    /// Charged leptons do not couple strongly; neutrinos only couple weakly.
    LeptonCheck,
}

impl InteractionDeterminator {
    /// Every determinator in application order.
    pub const ALL: [InteractionDeterminator; 2] = [
        InteractionDeterminator::GammaCheck,
        InteractionDeterminator::LeptonCheck,
    ];

    /// Returns the interaction types compatible with the known states.
    pub fn check(&self, known: &[&EdgeState]) -> BTreeSet<InteractionType> {
        let particles = known.iter().filter_map(|state| state.particle.as_deref());
        let mut allowed: BTreeSet<InteractionType> = InteractionType::ALL.into_iter().collect();
        for particle in particles {
            match self {
                InteractionDeterminator::GammaCheck if particle.is_photon() => {
                    allowed.remove(&InteractionType::Strong);
                }
                InteractionDeterminator::LeptonCheck if particle.is_neutrino() => {
                    allowed.retain(|interaction| *interaction == InteractionType::Weak);
                }
                InteractionDeterminator::LeptonCheck if particle.is_lepton() => {
                    allowed.remove(&InteractionType::Strong);
                }
                _ => {}
            }
        }
        allowed
    }
}

/// Intersects the user selection with every determinator's verdict.
pub fn determine_interaction_types(
    known: &[&EdgeState],
    allowed: &BTreeSet<InteractionType>,
) -> BTreeSet<InteractionType> {
    InteractionDeterminator::ALL
        .iter()
        .fold(allowed.clone(), |current, determinator| {
            current
                .intersection(&determinator.check(known))
                .copied()
                .collect()
        })
}
