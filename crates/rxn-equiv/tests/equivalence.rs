mod common;

use std::collections::BTreeSet;

use common::{particles, solve_chain};
use rxn_core::InteractionType;
use rxn_equiv::{canonical_signature, graph_hash, group_by_strength, remove_duplicates, InteractionStrength};
use rxn_solve::FormalismType;

const SCALARS: [&str; 2] = ["f(0)(980)", "f(0)(1500)"];

#[test]
fn helicity_formalism_ignores_orbital_momentum() {
    let p = particles();
    let graphs = solve_chain(&p, "gamma", ["pi0", "pi0"], &SCALARS, InteractionType::Strong, 0);
    assert_eq!(graphs.len(), 4);
    assert_eq!(remove_duplicates(graphs.clone(), FormalismType::Helicity).len(), 2);
    assert_eq!(remove_duplicates(graphs, FormalismType::CanonicalHelicity).len(), 4);
}

#[test]
fn different_particles_are_never_merged() {
    let p = particles();
    let graphs = solve_chain(&p, "gamma", ["pi0", "pi0"], &SCALARS, InteractionType::Strong, 0);
    let unique = remove_duplicates(graphs, FormalismType::Helicity);
    let names: BTreeSet<&str> = unique
        .iter()
        .flat_map(|graph| graph.intermediate_particle_names())
        .collect();
    assert_eq!(names, BTreeSet::from(SCALARS));
}

#[test]
fn relabeled_final_state_edges_are_duplicates() {
    let p = particles();
    let first = solve_chain(&p, "pi0", ["gamma", "pi0"], &["omega(782)"], InteractionType::Em, 0);
    let second = solve_chain(&p, "pi0", ["pi0", "gamma"], &["omega(782)"], InteractionType::Em, 1);
    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 2);
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(
            canonical_signature(a, FormalismType::Helicity),
            canonical_signature(b, FormalismType::Helicity)
        );
        assert_eq!(graph_hash(a, FormalismType::Helicity), graph_hash(b, FormalismType::Helicity));
    }
    let mut all = first.clone();
    all.extend(second);
    let unique = remove_duplicates(all, FormalismType::Helicity);
    assert_eq!(unique.len(), 2);
    assert!(unique.iter().all(|graph| graph.key().problem_index == 0));
}

#[test]
fn graph_hash_is_hex_sha256() {
    let p = particles();
    let graphs = solve_chain(&p, "gamma", ["pi0", "pi0"], &SCALARS, InteractionType::Strong, 0);
    let hash = graph_hash(&graphs[0], FormalismType::Helicity);
    assert_eq!(hash.len(), 64);
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(hash, graph_hash(&graphs[graphs.len() - 1], FormalismType::Helicity));
}

#[test]
fn strongest_duplicate_is_kept_and_groups_are_ordered() {
    let p = particles();
    let mut graphs = solve_chain(&p, "gamma", ["pi0", "pi0"], &SCALARS, InteractionType::Em, 0);
    graphs.extend(solve_chain(&p, "gamma", ["pi0", "pi0"], &SCALARS, InteractionType::Strong, 1));

    let groups = group_by_strength(&graphs);
    let strengths: Vec<f64> = groups.iter().map(|group| group.strength.value()).collect();
    assert_eq!(strengths, vec![60.0, 1.0]);
    assert!(groups[0]
        .graphs
        .windows(2)
        .all(|pair| pair[0].key() <= pair[1].key()));

    let unique = remove_duplicates(graphs, FormalismType::Helicity);
    assert_eq!(unique.len(), 2);
    assert!(unique
        .iter()
        .all(|graph| InteractionStrength::of(graph) == InteractionStrength(60.0)));
}
