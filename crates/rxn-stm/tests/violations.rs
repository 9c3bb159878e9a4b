mod common;

use std::collections::BTreeSet;

use rxn_stm::{check_reaction_violations, ManagerConfig, ReactionRequest};

use common::lookup;

fn violations(initial: &[&str], final_state: &[&str]) -> BTreeSet<String> {
    let request = ReactionRequest::new(initial.iter().copied(), final_state.iter().copied());
    check_reaction_violations(lookup().as_ref(), &request, &ManagerConfig::default()).unwrap()
}

#[test]
fn direct_transitions_report_the_failing_conservation_laws() {
    let cases: &[(&[&str], &[&str], &[&str])] = &[
        (&["p", "p~"], &["pi+", "pi0"], &["charge_conservation", "isospin_conservation"]),
        (&["eta"], &["gamma", "gamma"], &[]),
        (&["e+", "e-"], &["mu+", "mu-"], &[]),
        (
            &["mu-"],
            &["e-", "nu(e)~"],
            &["muon_ln_conservation", "spin_magnitude_conservation"],
        ),
        (
            &["mu-"],
            &["e-", "nu(e)"],
            &["electron_ln_conservation", "muon_ln_conservation", "spin_magnitude_conservation"],
        ),
        (
            &["e-", "p"],
            &["nu(e)", "pi0"],
            &["baryon_number_conservation", "spin_magnitude_conservation"],
        ),
        (&["f(0)(980)"], &["pi+", "pi-"], &[]),
        (&["pi0"], &["gamma", "gamma"], &[]),
        (&["pi0"], &["gamma", "gamma", "gamma"], &["c_parity_conservation"]),
        (&["pi0"], &["e+", "e-", "gamma"], &[]),
        (&["pi0"], &["e+", "e-"], &[]),
        (
            &["J/psi(1S)"],
            &["pi0", "f(0)(980)"],
            &["c_parity_conservation", "isospin_conservation"],
        ),
        (
            &["p"],
            &["e+", "gamma"],
            &["baryon_number_conservation", "electron_ln_conservation"],
        ),
        (&["p", "p"], &["p", "p", "p", "p~"], &[]),
        (&["K-"], &["pi-", "pi0"], &["isospin_conservation", "strangeness_conservation"]),
        (
            &["rho(770)0"],
            &["pi0", "pi0"],
            &[
                "c_parity_conservation",
                "identical_particle_symmetrization",
                "isospin_conservation",
            ],
        ),
        (&["rho(770)0"], &["gamma", "gamma"], &["c_parity_conservation"]),
        (&["rho(770)0"], &["gamma", "gamma", "gamma"], &[]),
        (
            &["J/psi(1S)"],
            &["pi0", "eta"],
            &["c_parity_conservation", "isospin_conservation"],
        ),
        (
            &["J/psi(1S)"],
            &["rho(770)0", "rho(770)0"],
            &["c_parity_conservation", "g_parity_conservation"],
        ),
        (
            &["K~0"],
            &["pi+", "pi-", "pi0"],
            &["isospin_conservation", "strangeness_conservation"],
        ),
    ];
    for (initial, final_state, expected) in cases {
        let expected: BTreeSet<String> = expected.iter().map(|name| name.to_string()).collect();
        assert_eq!(
            violations(initial, final_state),
            expected,
            "{initial:?} -> {final_state:?}"
        );
    }
}

#[test]
fn scattering_skips_the_mass_threshold() {
    // below threshold, yet only decays are bound by the parent mass
    assert!(violations(&["e+", "e-"], &["mu+", "mu-"]).is_empty());
    assert_eq!(
        violations(&["pi0"], &["p", "p~"]),
        BTreeSet::from(["mass_conservation".to_string()])
    );
}

#[test]
fn coupling_rules_only_show_up_alone() {
    let forbidden = violations(&["J/psi(1S)"], &["pi0", "f(0)(980)"]);
    assert!(!forbidden.contains("parity_conservation_helicity"));
    assert!(!forbidden.is_empty());
}
