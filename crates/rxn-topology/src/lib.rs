#![deny(missing_docs)]
#![doc = "Topology builder for reaction state-transition graphs: immutable node/edge skeletons for isobar and n-body decompositions."]

mod builder;
mod hash;
mod topology;

pub use builder::{build_topologies, create_isobar_topologies, create_nbody_topology, TopologyOpts};
pub use hash::{structural_hash, structural_signature};
pub use topology::{EdgeEndpoints, Topology, TopologyDraft};
