mod common;

use common::{canonical_node, evaluate, node, particles, passes, state, with_interaction, with_prefactor};
use rxn_core::{InteractionType, Parity};
use rxn_qn::{EdgeQn, QnValue};
use rxn_rules::{AdditiveQn, GraphRule, NodeRule, NodeView, Rule, Side, Verdict, ViolationKind};

#[test]
fn c_parity_forbids_jpsi_to_pi0_eta() {
    let p = particles();
    let jpsi = state(&p, "J/psi(1S)", 0);
    let (pi0, eta) = (state(&p, "pi0", 0), state(&p, "eta", 0));
    assert!(!passes(Rule::Node(NodeRule::CParity), &[&jpsi], &[&pi0, &eta], Some(&node(1, 0))));
}

#[test]
fn c_parity_forbids_three_photons_from_pi0() {
    let p = particles();
    let pi0 = state(&p, "pi0", 0);
    let photons = [state(&p, "gamma", -2), state(&p, "gamma", 2), state(&p, "gamma", 2)];
    let outgoing: Vec<_> = photons.iter().collect();
    assert!(!passes(Rule::Node(NodeRule::CParity), &[&pi0], &outgoing, None));
}

#[test]
fn c_parity_of_charged_pion_pair_follows_orbital_momentum() {
    let p = particles();
    let rho = state(&p, "rho(770)0", 0);
    let (pip, pim) = (state(&p, "pi+", 0), state(&p, "pi-", 0));
    let rule = Rule::Node(NodeRule::CParity);
    assert!(passes(rule, &[&rho], &[&pip, &pim], Some(&node(1, 0))));
    assert!(!passes(rule, &[&rho], &[&pip, &pim], Some(&node(0, 0))));
}

#[test]
fn g_parity_forbids_omega_to_two_pions() {
    let p = particles();
    let (pip, pim) = (state(&p, "pi+", 0), state(&p, "pi-", 0));
    let rule = Rule::Node(NodeRule::GParity);
    let omega = state(&p, "omega(782)", 0);
    let rho = state(&p, "rho(770)0", 0);
    assert!(!passes(rule, &[&omega], &[&pip, &pim], Some(&node(1, 0))));
    assert!(passes(rule, &[&rho], &[&pip, &pim], Some(&node(1, 0))));
}

#[test]
fn isospin_rejects_rho_to_two_neutral_pions() {
    let p = particles();
    let (pi0a, pi0b) = (state(&p, "pi0", 0), state(&p, "pi0", 0));
    let rule = Rule::Node(NodeRule::Isospin);
    assert!(!passes(rule, &[&state(&p, "rho(770)0", 0)], &[&pi0a, &pi0b], None));
    assert!(passes(rule, &[&state(&p, "f(0)(980)", 0)], &[&pi0a, &pi0b], None));
    assert!(passes(
        rule,
        &[&state(&p, "f(0)(980)", 0)],
        &[&state(&p, "pi+", 0), &state(&p, "pi-", 0)],
        None
    ));
}

#[test]
fn identical_bosons_forbid_negative_parent_parity() {
    let p = particles();
    let (pi0a, pi0b) = (state(&p, "pi0", 0), state(&p, "pi0", 0));
    let rule = Rule::Node(NodeRule::IdenticalParticleSymmetrization);
    assert!(!passes(rule, &[&state(&p, "rho(770)0", 0)], &[&pi0a, &pi0b], None));
    assert!(passes(rule, &[&state(&p, "f(0)(980)", 0)], &[&pi0a, &pi0b], None));
}

#[test]
fn parity_with_orbital_momentum() {
    let p = particles();
    let (pip, pim) = (state(&p, "pi+", 0), state(&p, "pi-", 0));
    let rho = state(&p, "rho(770)0", 0);
    let rule = Rule::Node(NodeRule::Parity);
    assert!(passes(rule, &[&rho], &[&pip, &pim], Some(&node(1, 0))));
    assert!(!passes(rule, &[&rho], &[&pip, &pim], Some(&node(2, 0))));
}

#[test]
fn parity_prefactor_must_match_intrinsic_parities() {
    let p = particles();
    let f0 = state(&p, "f(0)(980)", 0);
    let (pi0a, pi0b) = (state(&p, "pi0", 0), state(&p, "pi0", 0));
    let rule = Rule::Node(NodeRule::ParityHelicity);
    assert!(passes(rule, &[&f0], &[&pi0a, &pi0b], Some(&with_prefactor(node(0, 0), Parity::Plus))));
    assert!(!passes(rule, &[&f0], &[&pi0a, &pi0b], Some(&with_prefactor(node(0, 0), Parity::Minus))));
}

#[test]
fn spin_magnitude_couples_through_s_and_l() {
    let p = particles();
    let jpsi = state(&p, "J/psi(1S)", 2);
    let (gamma, f0) = (state(&p, "gamma", 2), state(&p, "f(0)(980)", 0));
    let rule = Rule::Node(NodeRule::SpinMagnitude);
    assert!(passes(rule, &[&jpsi], &[&gamma, &f0], Some(&node(0, 2))));
    assert!(!passes(rule, &[&jpsi], &[&gamma, &f0], Some(&node(0, 0))));
    assert!(passes(rule, &[&jpsi], &[&gamma, &f0], Some(&node(2, 2))));
}

#[test]
fn canonical_spin_conservation_checks_projections() {
    let p = particles();
    let f0 = state(&p, "f(0)(980)", 0);
    let (pi0a, pi0b) = (state(&p, "pi0", 0), state(&p, "pi0", 0));
    let rule = Rule::Node(NodeRule::Spin);
    assert!(passes(rule, &[&f0], &[&pi0a, &pi0b], Some(&canonical_node((0, 0), (0, 0)))));
    assert!(!passes(rule, &[&f0], &[&pi0a, &pi0b], Some(&canonical_node((1, 0), (0, 0)))));
}

#[test]
fn helicity_difference_bounded_by_parent_spin() {
    let p = particles();
    let f0 = state(&p, "f(0)(980)", 0);
    let rule = Rule::Node(NodeRule::Helicity);
    let (up, down) = (state(&p, "gamma", 2), state(&p, "gamma", -2));
    assert!(passes(rule, &[&f0], &[&up, &state(&p, "gamma", 2)], None));
    assert!(!passes(rule, &[&f0], &[&up, &down], None));
}

#[test]
fn clebsch_gordan_rejects_odd_l_for_scalar_pair() {
    let p = particles();
    let f0 = state(&p, "f(0)(980)", 0);
    let (pi0a, pi0b) = (state(&p, "pi0", 0), state(&p, "pi0", 0));
    let rule = Rule::Node(NodeRule::ClebschGordanHelicityToCanonical);
    assert!(passes(rule, &[&f0], &[&pi0a, &pi0b], Some(&node(0, 0))));
    assert!(!passes(rule, &[&f0], &[&pi0a, &pi0b], Some(&node(1, 0))));
}

#[test]
fn additive_rule_restricts_single_open_edge() {
    let p = particles();
    let jpsi = state(&p, "J/psi(1S)", 0);
    let pip = state(&p, "pi+", 0);
    let incoming = [Some(&jpsi)];
    let outgoing = [Some(&pip), None];
    let verdict = Rule::Node(NodeRule::Additive(AdditiveQn::Charge)).evaluate(&NodeView {
        incoming: &incoming,
        outgoing: &outgoing,
        node: None,
    });
    let Verdict::Restrict(restriction) = verdict else {
        panic!("expected a restriction, got {verdict:?}");
    };
    assert_eq!(restriction.side, Side::Outgoing);
    assert_eq!(restriction.position, 1);
    assert_eq!(restriction.qn, EdgeQn::Charge);
    assert_eq!(restriction.allowed, vec![QnValue::Int(-1)]);
    assert!(restriction.admits(&state(&p, "pi-", 0).qns));
    assert!(!restriction.admits(&state(&p, "pi0", 0).qns));
}

#[test]
fn additive_rule_defers_with_two_open_edges() {
    let p = particles();
    let jpsi = state(&p, "J/psi(1S)", 0);
    let incoming = [Some(&jpsi)];
    let outgoing = [None, None];
    let verdict = Rule::Node(NodeRule::Additive(AdditiveQn::Charge)).evaluate(&NodeView {
        incoming: &incoming,
        outgoing: &outgoing,
        node: None,
    });
    assert_eq!(verdict, Verdict::Deferred);
}

#[test]
fn charge_and_lepton_numbers_are_summed() {
    let p = particles();
    let pi0 = state(&p, "pi0", 0);
    let gamma = state(&p, "gamma", 2);
    let charge = Rule::Node(NodeRule::Additive(AdditiveQn::Charge));
    assert!(!passes(charge, &[&pi0], &[&state(&p, "pi+", 0), &gamma], None));

    let pip = state(&p, "pi+", 0);
    let (mup, nu) = (state(&p, "mu+", 1), state(&p, "nu(e)", 1));
    assert!(passes(charge, &[&pip], &[&mup, &nu], None));
    let muon_ln = Rule::Node(NodeRule::Additive(AdditiveQn::MuonLeptonNumber));
    assert!(!passes(muon_ln, &[&pip], &[&mup, &nu], None));
}

#[test]
fn interaction_type_compatibility_follows_particle_kinds() {
    let p = particles();
    let f0 = state(&p, "f(0)(980)", 0);
    let (g1, g2) = (state(&p, "gamma", 2), state(&p, "gamma", 2));
    let rule = Rule::Node(NodeRule::InteractionTypeCompatibility);
    let strong = node(0, 0);
    assert!(!passes(rule, &[&f0], &[&g1, &g2], Some(&strong)));
    assert!(passes(rule, &[&f0], &[&g1, &g2], Some(&with_interaction(strong, InteractionType::Em))));

    let pip = state(&p, "pi+", 0);
    let (ep, nu) = (state(&p, "e+", 1), state(&p, "nu(e)", 1));
    assert!(!passes(rule, &[&pip], &[&ep, &nu], Some(&with_interaction(strong, InteractionType::Em))));
    assert!(passes(rule, &[&pip], &[&ep, &nu], Some(&with_interaction(strong, InteractionType::Weak))));
}

#[test]
fn missing_node_numbers_fail_closed() {
    let p = particles();
    let rho = state(&p, "rho(770)0", 0);
    let (pip, pim) = (state(&p, "pi+", 0), state(&p, "pi-", 0));
    for rule in [
        Rule::Node(NodeRule::Parity),
        Rule::Node(NodeRule::SpinMagnitude),
        Rule::Node(NodeRule::InteractionTypeCompatibility),
    ] {
        match evaluate(rule, &[&rho], &[&pip, &pim], None) {
            Verdict::Fail(violation) => assert_eq!(violation.kind, ViolationKind::MissingInput, "{rule}"),
            other => panic!("{rule}: expected failure, got {other:?}"),
        }
    }
}

#[test]
fn unresolved_edges_defer_node_rules() {
    let p = particles();
    let rho = state(&p, "rho(770)0", 0);
    let incoming = [Some(&rho)];
    let outgoing = [None, None];
    let view = NodeView {
        incoming: &incoming,
        outgoing: &outgoing,
        node: None,
    };
    assert_eq!(Rule::Node(NodeRule::CParity).evaluate(&view), Verdict::Deferred);
    assert_eq!(
        Rule::Graph(GraphRule::MassConservation { width_factor: 0.0 }).evaluate(&view),
        Verdict::Deferred
    );
}

#[test]
fn mass_threshold_with_width_factor() {
    let p = particles();
    let f0 = state(&p, "f(0)(980)", 0);
    let strict = Rule::Graph(GraphRule::MassConservation { width_factor: 0.0 });
    let (kp, km) = (state(&p, "K+", 0), state(&p, "K-", 0));
    assert!(passes(strict, &[&f0], &[&kp, &km], None));

    let (proton, antiproton) = (state(&p, "p", 1), state(&p, "p~", 1));
    assert!(!passes(strict, &[&f0], &[&proton, &antiproton], None));
    let loose = Rule::Graph(GraphRule::MassConservation { width_factor: 3.0 });
    assert!(!passes(loose, &[&f0], &[&proton, &antiproton], None));

    let pi0 = state(&p, "pi0", 0);
    assert!(!passes(strict, &[&pi0], &[&state(&p, "pi0", 0)], None));
}

#[test]
fn rule_names_are_stable() {
    assert_eq!(Rule::Node(NodeRule::CParity).name(), "c_parity_conservation");
    assert_eq!(Rule::Node(NodeRule::Additive(AdditiveQn::ElectronLeptonNumber)).to_string(), "electron_ln_conservation");
    assert_eq!(Rule::Graph(GraphRule::MassConservation { width_factor: 1.0 }).name(), "mass_conservation");
}

#[test]
fn order_key_runs_cheap_rules_first() {
    let mut rules = vec![
        Rule::Graph(GraphRule::MassConservation { width_factor: 0.0 }),
        Rule::Node(NodeRule::Isospin),
        Rule::Edge(rxn_rules::EdgeRule::GellMannNishijima),
        Rule::Node(NodeRule::Additive(AdditiveQn::Charge)),
    ];
    rules.sort_by_key(Rule::order_key);
    let names: Vec<&str> = rules.iter().map(Rule::name).collect();
    assert_eq!(
        names,
        ["gell_mann_nishijima", "charge_conservation", "isospin_conservation", "mass_conservation"]
    );
}

#[test]
fn coupling_rules_are_the_l_s_dependent_parity_and_spin_checks() {
    let coupling = [
        NodeRule::Parity,
        NodeRule::ParityHelicity,
        NodeRule::Helicity,
        NodeRule::Spin,
        NodeRule::ClebschGordanHelicityToCanonical,
    ];
    for rule in coupling {
        assert!(Rule::Node(rule).is_coupling_rule(), "{}", Rule::Node(rule).name());
    }
    for rule in [
        NodeRule::SpinMagnitude,
        NodeRule::CParity,
        NodeRule::Isospin,
        NodeRule::Additive(AdditiveQn::Charge),
    ] {
        assert!(!Rule::Node(rule).is_coupling_rule(), "{}", Rule::Node(rule).name());
    }
    assert!(!Rule::Graph(GraphRule::MassConservation { width_factor: 0.0 }).is_coupling_rule());
}
