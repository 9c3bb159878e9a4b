use std::sync::Arc;

use rxn_core::{HalfInteger, InteractionType, ParticleRecord, RxnError};
use serde::{Deserialize, Serialize};

use crate::numbers::{EdgeQuantumNumbers, NodeQuantumNumbers};

/// Particle hypothesis attached to one edge of one search branch.
///
/// The particle is `None` until the edge is resolved. Instances are never shared across
/// branches, so they carry no interior mutability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeState {
    /// Resolved particle record.
    pub particle: Option<Arc<ParticleRecord>>,
    /// Quantum numbers known for this edge.
    pub qns: EdgeQuantumNumbers,
}

impl EdgeState {
    /// Returns a state with no particle and no quantum numbers.
    pub fn unresolved() -> Self {
        Self {
            particle: None,
            qns: EdgeQuantumNumbers::default(),
        }
    }

    /// Converts a particle record into a fully specified state.
    pub fn from_particle(particle: Arc<ParticleRecord>, spin_projection: HalfInteger) -> Result<Self, RxnError> {
        let qns = EdgeQuantumNumbers::from_particle(&particle, spin_projection)?;
        Ok(Self {
            particle: Some(particle),
            qns,
        })
    }

    /// Returns `true` when a particle is attached.
    pub fn is_resolved(&self) -> bool {
        self.particle.is_some()
    }

    /// Returns the particle name, if resolved.
    pub fn particle_name(&self) -> Option<&str> {
        self.particle.as_deref().map(|particle| particle.name.as_str())
    }
}

/// Interaction type and quantum numbers attached to one node of a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeProperties {
    /// Interaction strength class of the vertex.
    pub interaction_type: Option<InteractionType>,
    /// L, S and parity prefactor assignment.
    pub qns: NodeQuantumNumbers,
}
