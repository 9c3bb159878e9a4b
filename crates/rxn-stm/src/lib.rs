#![deny(missing_docs)]
#![doc = "State transition manager: validates a reaction request, seeds problem sets over all topologies, solves them strongest interaction first and returns deduplicated solutions with diagnostics."]

pub mod config;
mod facts;
pub mod logging;
pub mod manager;
mod result;
pub mod violations;

pub use config::{load_config, load_request, ManagerConfig, ReactionRequest, SolvingMode, StateSpec};
pub use logging::init_tracing;
pub use manager::{ProblemSets, StateTransitionManager};
pub use result::ReactionResult;
pub use violations::check_reaction_violations;
