use std::collections::BTreeMap;

use rxn_solve::{FormalismType, StateTransitionGraph};

use crate::signature::canonical_signature;

/// Keeps one representative per equivalence class.
///
/// The representative is the strongest graph of its class, the smallest solution key
/// among equally strong ones. The output is sorted by solution key.
pub fn remove_duplicates(
    graphs: Vec<StateTransitionGraph>,
    formalism: FormalismType,
) -> Vec<StateTransitionGraph> {
    let total = graphs.len();
    let mut kept: BTreeMap<String, StateTransitionGraph> = BTreeMap::new();
    for graph in graphs {
        let signature = canonical_signature(&graph, formalism);
        match kept.get(&signature) {
            Some(known) if !replaces(&graph, known) => {}
            _ => {
                kept.insert(signature, graph);
            }
        }
    }
    let mut unique: Vec<StateTransitionGraph> = kept.into_values().collect();
    unique.sort_by(|a, b| a.key().cmp(b.key()));
    tracing::debug!(before = total, after = unique.len(), "removed duplicate solutions");
    unique
}

fn replaces(candidate: &StateTransitionGraph, known: &StateTransitionGraph) -> bool {
    match candidate.strength().total_cmp(&known.strength()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => candidate.key() < known.key(),
    }
}
