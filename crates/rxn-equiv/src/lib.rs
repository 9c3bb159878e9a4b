#![deny(missing_docs)]
#![doc = "Graph equivalence and result filtering: canonical signatures of solution graphs, duplicate removal and grouping by interaction strength."]

mod filter;
mod signature;
mod strength;

pub use filter::remove_duplicates;
pub use signature::{canonical_signature, graph_hash};
pub use strength::{group_by_strength, InteractionStrength, StrengthGroup};
