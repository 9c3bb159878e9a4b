#![deny(missing_docs)]
#![doc = "Constraint solver: per-node interaction settings, problem sets seeded with initial facts, and the staged backtracking propagator that turns them into state transition graphs."]

pub mod budget;
pub mod determinator;
pub mod diagnostics;
pub mod formalism;
pub mod graph;
pub mod problem;
mod search;
pub mod settings;

pub use budget::{CancelToken, SearchBudget};
pub use determinator::{determine_interaction_types, InteractionDeterminator};
pub use diagnostics::{merge_diagnostics, Diagnostic, DiagnosticSource};
pub use formalism::FormalismType;
pub use graph::{SolutionKey, StateTransitionGraph};
pub use problem::{default_spin_projections, InitialFacts, ProblemSet};
pub use search::{solve, ProblemOutcome};
pub use settings::{default_edge_domains, default_interaction_settings, InteractionSettings};
