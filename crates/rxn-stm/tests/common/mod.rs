#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rxn_core::{HalfInteger, ParticleCollection, ParticleLookup, ParticleRecord};
use rxn_stm::{ManagerConfig, ReactionRequest, ReactionResult, StateSpec, StateTransitionManager};

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

pub fn lookup() -> Arc<dyn ParticleLookup> {
    let bytes = fs::read(workspace_root().join("fixtures/particles.yaml")).unwrap();
    let records: Vec<ParticleRecord> = serde_yaml::from_slice(&bytes).unwrap();
    Arc::new(ParticleCollection::from_records(records).unwrap())
}

pub fn manager(request: ReactionRequest, config: ManagerConfig) -> StateTransitionManager {
    StateTransitionManager::configure(lookup(), request, config).unwrap()
}

pub fn run(request: ReactionRequest, config: ManagerConfig) -> ReactionResult {
    let manager = manager(request, config);
    let sets = manager.create_problem_sets().unwrap();
    manager.find_solutions(&sets).unwrap()
}

/// `J/psi(1S)` with helicity +-1, as produced in e+e- collisions.
pub fn polarized_jpsi() -> StateSpec {
    StateSpec::with_projections("J/psi(1S)", &[HalfInteger::from_int(-1), HalfInteger::from_int(1)])
}

pub fn jpsi_radiative(final_state: &[&str]) -> ReactionRequest {
    ReactionRequest::new([polarized_jpsi()], final_state.iter().copied())
}
