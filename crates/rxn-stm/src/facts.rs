//! Assignment of the requested external particles to the external edges of a topology.

use std::collections::BTreeSet;
use std::sync::Arc;

use itertools::Itertools;
use rxn_core::{spin_projections, EdgeId, ErrorInfo, HalfInteger, ParticleLookup, ParticleRecord, RxnError};
use rxn_qn::EdgeState;
use rxn_solve::{default_spin_projections, InitialFacts};
use rxn_topology::Topology;

use crate::config::StateSpec;

/// A resolved external particle with the projections it is enumerated with.
#[derive(Debug, Clone)]
pub(crate) struct ExternalState {
    pub(crate) record: Arc<ParticleRecord>,
    pub(crate) projections: Vec<HalfInteger>,
}

impl ExternalState {
    fn label(&self) -> (String, Vec<HalfInteger>) {
        (self.record.name.clone(), self.projections.clone())
    }
}

/// Looks up every state; unknown names become [`RxnError::UnknownParticle`].
pub(crate) fn resolve_states(lookup: &dyn ParticleLookup, specs: &[StateSpec]) -> Result<Vec<ExternalState>, RxnError> {
    specs.iter().map(|spec| resolve_state(lookup, spec)).collect()
}

fn resolve_state(lookup: &dyn ParticleLookup, spec: &StateSpec) -> Result<ExternalState, RxnError> {
    let record = lookup.find(spec.name()).map_err(|_| {
        RxnError::UnknownParticle(
            ErrorInfo::new("unknown-particle", "particle name is not known to the lookup")
                .with_context("token", spec.name()),
        )
    })?;
    let projections = match spec.spin_projections() {
        None => default_spin_projections(&record),
        Some(requested) => {
            let valid = spin_projections(record.spin);
            if let Some(bad) = requested.iter().find(|projection| !valid.contains(projection)) {
                return Err(RxnError::Config(
                    ErrorInfo::new("invalid-spin-projection", "spin projection not allowed for the particle spin")
                        .with_context("particle", record.name.clone())
                        .with_context("projection", bad.to_string()),
                ));
            }
            requested.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
        }
    };
    if projections.is_empty() {
        return Err(RxnError::Config(
            ErrorInfo::new("invalid-spin-projection", "no spin projection selected")
                .with_context("particle", record.name.clone()),
        ));
    }
    Ok(ExternalState { record, projections })
}

type NodeGroups = Vec<Vec<(String, Vec<HalfInteger>)>>;

/// Sorted per-node lists of the states attached below (or above) each node.
fn node_groups(attached: &[Vec<EdgeId>], edges: &[EdgeId], states: &[&ExternalState]) -> NodeGroups {
    let mut groups: NodeGroups = attached
        .iter()
        .map(|node_edges| {
            let mut group: Vec<_> = node_edges
                .iter()
                .filter_map(|edge| edges.iter().position(|known| known == edge))
                .map(|position| states[position].label())
                .collect();
            group.sort();
            group
        })
        .collect();
    groups.sort();
    groups
}

fn matches_grouping(groups: &NodeGroups, grouping: &[Vec<String>]) -> bool {
    grouping.iter().all(|group| {
        let mut wanted = group.clone();
        wanted.sort();
        groups.iter().any(|node_group| {
            let names: Vec<&str> = node_group.iter().map(|(name, _)| name.as_str()).collect();
            names == wanted
        })
    })
}

/// Every distinct way to place `states` on `edges`.
///
/// Two placements are the same when every node sees the same sorted states attached to
/// it. Placements violating all `groupings` are dropped; no groupings keeps every
/// placement. The first placement of each class wins, in permutation order.
fn placements(
    edges: &[EdgeId],
    states: &[ExternalState],
    attached: &[Vec<EdgeId>],
    groupings: &[Vec<Vec<String>>],
) -> Vec<Vec<usize>> {
    let mut seen = BTreeSet::new();
    let mut kept = Vec::new();
    for permutation in (0..states.len()).permutations(states.len()) {
        let placed: Vec<&ExternalState> = permutation.iter().map(|index| &states[*index]).collect();
        let groups = node_groups(attached, edges, &placed);
        if !groupings.is_empty() && !groupings.iter().any(|grouping| matches_grouping(&groups, grouping)) {
            continue;
        }
        if seen.insert(groups) {
            kept.push(permutation);
        }
    }
    kept
}

/// Builds the initial facts of one topology: every distinct particle placement times
/// every spin projection combination of the external edges.
pub(crate) fn initial_facts(
    topology: &Topology,
    initial: &[ExternalState],
    final_state: &[ExternalState],
    groupings: &[Vec<Vec<String>>],
) -> Result<Vec<InitialFacts>, RxnError> {
    let initial_edges = topology.initial_state_edges();
    let final_edges = topology.final_state_edges();
    if initial_edges.len() != initial.len() || final_edges.len() != final_state.len() {
        return Err(RxnError::Topology(
            ErrorInfo::new("external-edge-mismatch", "topology and request differ in external state count")
                .with_context("initial", format!("{} vs {}", initial_edges.len(), initial.len()))
                .with_context("final", format!("{} vs {}", final_edges.len(), final_state.len())),
        ));
    }
    let attached_initial: Vec<Vec<EdgeId>> = topology
        .node_ids()
        .map(|node| topology.originating_initial_state_edges(node))
        .collect();
    let attached_final: Vec<Vec<EdgeId>> = topology
        .node_ids()
        .map(|node| topology.originating_final_state_edges(node))
        .collect();
    let initial_placements = placements(&initial_edges, initial, &attached_initial, &[]);
    let final_placements = placements(&final_edges, final_state, &attached_final, groupings);

    let edges: Vec<EdgeId> = initial_edges.iter().chain(final_edges.iter()).copied().collect();
    let mut facts = Vec::new();
    for initial_order in &initial_placements {
        for final_order in &final_placements {
            let placed: Vec<&ExternalState> = initial_order
                .iter()
                .map(|index| &initial[*index])
                .chain(final_order.iter().map(|index| &final_state[*index]))
                .collect();
            let combinations = placed
                .iter()
                .map(|state| state.projections.iter().copied())
                .multi_cartesian_product();
            for projections in combinations {
                let mut assignment = InitialFacts::new();
                for ((edge, state), projection) in edges.iter().zip(&placed).zip(projections) {
                    assignment.insert(*edge, EdgeState::from_particle(Arc::clone(&state.record), projection)?);
                }
                facts.push(assignment);
            }
        }
    }
    tracing::debug!(
        initial_placements = initial_placements.len(),
        final_placements = final_placements.len(),
        facts = facts.len(),
        "built initial facts"
    );
    Ok(facts)
}
