#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rxn_core::{EdgeId, HalfInteger, InteractionType, NodeId, ParticleCollection, ParticleLookup, ParticleRecord};
use rxn_qn::EdgeState;
use rxn_solve::{default_interaction_settings, FormalismType, InitialFacts, ProblemSet};
use rxn_topology::{create_isobar_topologies, Topology};

pub fn particles() -> ParticleCollection {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/particles.yaml");
    let bytes = fs::read(path).unwrap();
    let records: Vec<ParticleRecord> = serde_yaml::from_slice(&bytes).unwrap();
    ParticleCollection::from_records(records).unwrap()
}

pub fn state(particles: &ParticleCollection, name: &str, doubled_projection: i32) -> EdgeState {
    EdgeState::from_particle(particles.find(name).unwrap(), HalfInteger::from_doubled(doubled_projection)).unwrap()
}

pub fn candidates(particles: &ParticleCollection, names: &[&str]) -> Arc<Vec<Arc<ParticleRecord>>> {
    let mut records: Vec<Arc<ParticleRecord>> = names.iter().map(|name| particles.find(name).unwrap()).collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    Arc::new(records)
}

pub fn all_candidates(particles: &ParticleCollection) -> Arc<Vec<Arc<ParticleRecord>>> {
    Arc::new(particles.particles().collect())
}

/// The only isobar topology of a `1 -> 2` decay.
pub fn two_body() -> Topology {
    create_isobar_topologies(1, 2).unwrap().remove(0)
}

/// The only isobar topology of a `1 -> 3` decay.
pub fn three_body() -> Topology {
    create_isobar_topologies(1, 3).unwrap().remove(0)
}

/// Node fed by the initial-state edge.
pub fn root_node(topology: &Topology) -> NodeId {
    let initial = topology.initial_state_edges()[0];
    topology.edge(initial).unwrap().ending_node.unwrap()
}

/// Final-state edges attached directly to the root node.
pub fn root_final_edges(topology: &Topology) -> Vec<EdgeId> {
    let root = root_node(topology);
    topology
        .outgoing_edges(root)
        .iter()
        .copied()
        .filter(|edge| topology.is_external(*edge))
        .collect()
}

pub fn problem_set(
    topology: Topology,
    facts: InitialFacts,
    candidates: Arc<Vec<Arc<ParticleRecord>>>,
    interactions: &[(NodeId, InteractionType)],
    formalism: FormalismType,
) -> ProblemSet {
    let lookup: BTreeMap<NodeId, InteractionType> = interactions.iter().copied().collect();
    let node_settings = topology
        .node_ids()
        .map(|node| {
            let interaction = lookup.get(&node).copied().unwrap_or(InteractionType::Strong);
            let settings =
                default_interaction_settings(formalism, interaction, topology.is_two_body_node(node), 0.0);
            (node, settings)
        })
        .collect();
    ProblemSet {
        topology_index: 0,
        topology: Arc::new(topology),
        facts,
        node_settings,
        candidates,
        formalism,
    }
}

/// Two-body decay with every node solved strongly.
pub fn two_body_problem(particles: &ParticleCollection, parent: &str, daughters: [&str; 2]) -> ProblemSet {
    let topology = two_body();
    let mut facts = InitialFacts::new();
    facts.insert(topology.initial_state_edges()[0], state(particles, parent, 0));
    for (edge, name) in topology.final_state_edges().into_iter().zip(daughters) {
        facts.insert(edge, state(particles, name, 0));
    }
    problem_set(topology, facts, all_candidates(particles), &[], FormalismType::Helicity)
}

/// `J/psi(1S) -> gamma pi0 pi0` with the photon attached to the root node.
pub fn jpsi_radiative(
    particles: &ParticleCollection,
    candidates: Arc<Vec<Arc<ParticleRecord>>>,
    jpsi_projection: i32,
    gamma_projection: i32,
) -> ProblemSet {
    let topology = three_body();
    let root = root_node(&topology);
    let photon_edge = root_final_edges(&topology)[0];
    let mut facts = InitialFacts::new();
    facts.insert(topology.initial_state_edges()[0], state(particles, "J/psi(1S)", jpsi_projection));
    for edge in topology.final_state_edges() {
        let daughter = if edge == photon_edge {
            state(particles, "gamma", gamma_projection)
        } else {
            state(particles, "pi0", 0)
        };
        facts.insert(edge, daughter);
    }
    let interactions: Vec<(NodeId, InteractionType)> = topology
        .node_ids()
        .map(|node| {
            let interaction = if node == root {
                InteractionType::Em
            } else {
                InteractionType::Strong
            };
            (node, interaction)
        })
        .collect();
    problem_set(topology, facts, candidates, &interactions, FormalismType::Helicity)
}
