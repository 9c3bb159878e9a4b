#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use rxn_core::{EdgeId, HalfInteger, InteractionType, NodeId, ParticleCollection, ParticleLookup, ParticleRecord};
use rxn_qn::EdgeState;
use rxn_solve::{
    default_interaction_settings, solve, FormalismType, InitialFacts, ProblemSet, SearchBudget,
    StateTransitionGraph,
};
use rxn_topology::{create_isobar_topologies, Topology};

pub fn particles() -> ParticleCollection {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/particles.yaml");
    let bytes = std::fs::read(path).unwrap();
    let records: Vec<ParticleRecord> = serde_yaml::from_slice(&bytes).unwrap();
    ParticleCollection::from_records(records).unwrap()
}

fn state(particles: &ParticleCollection, name: &str, projection: i32) -> EdgeState {
    EdgeState::from_particle(particles.find(name).unwrap(), HalfInteger::from_int(projection)).unwrap()
}

fn three_body() -> (Topology, NodeId, EdgeId, Vec<EdgeId>) {
    let topology = create_isobar_topologies(1, 3).unwrap().remove(0);
    let initial = topology.initial_state_edges()[0];
    let root = topology.edge(initial).unwrap().ending_node.unwrap();
    let root_final = topology
        .outgoing_edges(root)
        .iter()
        .copied()
        .find(|edge| topology.is_external(*edge))
        .unwrap();
    let daughter_finals: Vec<EdgeId> = topology
        .final_state_edges()
        .into_iter()
        .filter(|edge| *edge != root_final)
        .collect();
    (topology, root, root_final, daughter_finals)
}

/// Solves `J/psi(1S) -> X0 Y`, `Y -> Y1 Y2` with the root node electromagnetic.
pub fn solve_chain(
    particles: &ParticleCollection,
    root_final: &str,
    daughter_finals: [&str; 2],
    candidates: &[&str],
    daughter_interaction: InteractionType,
    problem_index: usize,
) -> Vec<StateTransitionGraph> {
    let (topology, root, root_edge, daughter_edges) = three_body();
    let mut facts = InitialFacts::new();
    facts.insert(topology.initial_state_edges()[0], state(particles, "J/psi(1S)", 1));
    let projection = |name: &str| if name == "gamma" { 1 } else { 0 };
    facts.insert(root_edge, state(particles, root_final, projection(root_final)));
    for (edge, name) in daughter_edges.into_iter().zip(daughter_finals) {
        facts.insert(edge, state(particles, name, projection(name)));
    }
    let node_settings = topology
        .node_ids()
        .map(|node| {
            let interaction = if node == root {
                InteractionType::Em
            } else {
                daughter_interaction
            };
            (
                node,
                default_interaction_settings(FormalismType::Helicity, interaction, true, 0.0),
            )
        })
        .collect();
    let mut records: Vec<Arc<ParticleRecord>> = candidates.iter().map(|name| particles.find(name).unwrap()).collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    let problem = ProblemSet {
        topology_index: 0,
        topology: Arc::new(topology),
        facts,
        node_settings,
        candidates: Arc::new(records),
        formalism: FormalismType::Helicity,
    };
    solve(&problem, problem_index, &SearchBudget::unlimited()).unwrap().solutions
}
