#![deny(missing_docs)]
#![doc = "Core data types shared by the reaction state-transition solver: identifiers, errors, exact half-integer arithmetic and the particle lookup capability."]

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod halfint;
pub mod interaction;
pub mod particle;
pub mod quantum;

pub use errors::{ErrorInfo, RxnError};
pub use halfint::HalfInteger;
pub use interaction::InteractionType;
pub use particle::{ParticleCollection, ParticleLookup, ParticleRecord};
pub use quantum::{spin_projections, Parity, Spin};

/// Identifier for a node (interaction vertex) within a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the identifier as an arena index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Identifier for an edge (particle line) within a topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }

    /// Returns the identifier as an arena index.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}
