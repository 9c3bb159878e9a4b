#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use rxn_core::{HalfInteger, InteractionType, Parity, ParticleCollection, ParticleLookup, ParticleRecord};
use rxn_qn::{EdgeState, NodeProperties, NodeQuantumNumbers};
use rxn_rules::{NodeView, Rule, Verdict};

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .canonicalize()
        .unwrap()
}

pub fn particles() -> ParticleCollection {
    let bytes = fs::read(workspace_root().join("fixtures/particles.yaml")).unwrap();
    let records: Vec<ParticleRecord> = serde_yaml::from_slice(&bytes).unwrap();
    ParticleCollection::from_records(records).unwrap()
}

/// Resolved state with the spin projection given in units of 1/2.
pub fn state(particles: &ParticleCollection, name: &str, doubled_projection: i32) -> EdgeState {
    let record = particles.find(name).unwrap();
    EdgeState::from_particle(record, HalfInteger::from_doubled(doubled_projection)).unwrap()
}

pub fn custom_state(record: ParticleRecord) -> EdgeState {
    EdgeState::from_particle(Arc::new(record), HalfInteger::ZERO).unwrap()
}

/// Helicity-style node with integer L and S given in units of 1/2.
pub fn node(l: i32, doubled_s: i32) -> NodeProperties {
    NodeProperties {
        interaction_type: Some(InteractionType::Strong),
        qns: NodeQuantumNumbers {
            l_magnitude: Some(HalfInteger::from_int(l)),
            s_magnitude: Some(HalfInteger::from_doubled(doubled_s)),
            ..NodeQuantumNumbers::default()
        },
    }
}

pub fn canonical_node(l: (i32, i32), doubled_s: (i32, i32)) -> NodeProperties {
    NodeProperties {
        interaction_type: Some(InteractionType::Strong),
        qns: NodeQuantumNumbers {
            l_magnitude: Some(HalfInteger::from_int(l.0)),
            l_projection: Some(HalfInteger::from_int(l.1)),
            s_magnitude: Some(HalfInteger::from_doubled(doubled_s.0)),
            s_projection: Some(HalfInteger::from_doubled(doubled_s.1)),
            parity_prefactor: None,
        },
    }
}

pub fn with_prefactor(mut props: NodeProperties, prefactor: Parity) -> NodeProperties {
    props.qns.parity_prefactor = Some(prefactor);
    props
}

pub fn with_interaction(mut props: NodeProperties, interaction: InteractionType) -> NodeProperties {
    props.interaction_type = Some(interaction);
    props
}

pub fn evaluate(
    rule: Rule,
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Verdict {
    let incoming: Vec<Option<&EdgeState>> = incoming.iter().copied().map(Some).collect();
    let outgoing: Vec<Option<&EdgeState>> = outgoing.iter().copied().map(Some).collect();
    rule.evaluate(&NodeView {
        incoming: &incoming,
        outgoing: &outgoing,
        node,
    })
}

pub fn passes(
    rule: Rule,
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> bool {
    match evaluate(rule, incoming, outgoing, node) {
        Verdict::Pass => true,
        Verdict::Fail(_) => false,
        other => panic!("rule {rule} did not decide: {other:?}"),
    }
}
