use std::sync::Arc;

use proptest::prelude::*;
use rxn_core::{HalfInteger, Parity, ParticleRecord, Spin};
use rxn_qn::{EdgeQn, EdgeQnDomains, EdgeState, NodeQnDomains, QnValue};

fn rho_plus() -> ParticleRecord {
    ParticleRecord {
        name: "rho(770)+".to_string(),
        pid: 213,
        mass: 0.77526,
        width: Some(0.1491),
        spin: HalfInteger::ONE,
        charge: 1,
        isospin: Some(Spin::new(HalfInteger::ONE, HalfInteger::ONE).unwrap()),
        parity: Some(Parity::Minus),
        c_parity: None,
        g_parity: Some(Parity::Plus),
        strangeness: 0,
        charmness: 0,
        bottomness: 0,
        topness: 0,
        baryon_number: 0,
        electron_lepton_number: 0,
        muon_lepton_number: 0,
        tau_lepton_number: 0,
    }
}

#[test]
fn particle_conversion_fills_every_defined_number() {
    let state = EdgeState::from_particle(Arc::new(rho_plus()), HalfInteger::from_int(-1)).unwrap();
    assert!(state.is_resolved());
    assert_eq!(state.particle_name(), Some("rho(770)+"));
    assert_eq!(state.qns.get(EdgeQn::Charge), Some(QnValue::Int(1)));
    assert_eq!(state.qns.get(EdgeQn::SpinProjection), Some(QnValue::Half(HalfInteger::from_int(-1))));
    assert_eq!(state.qns.get(EdgeQn::CParity), None);
    assert_eq!(state.qns.isospin().unwrap().projection(), HalfInteger::ONE);
}

#[test]
fn projection_outside_the_spin_is_rejected() {
    let err = EdgeState::from_particle(Arc::new(rho_plus()), HalfInteger::from_int(2)).unwrap_err();
    assert_eq!(err.code(), "invalid-spin");
}

#[test]
fn domains_reject_defined_values_only() {
    let state = EdgeState::from_particle(Arc::new(rho_plus()), HalfInteger::ZERO).unwrap();
    let narrow = EdgeQnDomains::new().with_int_range(EdgeQn::Charge, -1, 0);
    assert_eq!(narrow.first_violation(&state.qns), Some(EdgeQn::Charge));

    let c_parity_only = EdgeQnDomains::new().with(EdgeQn::CParity, [QnValue::Parity(Parity::Plus)]);
    assert!(c_parity_only.admits(&state.qns));
}

#[test]
fn helicity_node_domains_enumerate_in_ascending_order() {
    let domains = NodeQnDomains {
        l_magnitudes: vec![HalfInteger::ZERO, HalfInteger::ONE],
        s_magnitudes: vec![HalfInteger::HALF],
        parity_prefactors: Parity::ALL.to_vec(),
        with_projections: false,
    };
    let assignments = domains.enumerate();
    assert_eq!(assignments.len(), 4);
    assert_eq!(assignments[0].l_magnitude, Some(HalfInteger::ZERO));
    assert_eq!(assignments[0].parity_prefactor, Some(Parity::Minus));
    assert_eq!(assignments[3].l_magnitude, Some(HalfInteger::ONE));
    assert!(assignments.iter().all(|qns| qns.l_projection.is_none()));
}

#[test]
fn empty_node_domains_yield_a_single_blank_assignment() {
    let assignments = NodeQnDomains::empty().enumerate();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].l_magnitude, None);
}

proptest! {
    #[test]
    fn canonical_node_domains_count_every_projection(l_max in 0i32..4, s_doubled in 0i32..5) {
        let domains = NodeQnDomains {
            l_magnitudes: HalfInteger::unit_range(HalfInteger::ZERO, HalfInteger::from_int(l_max)),
            s_magnitudes: vec![HalfInteger::from_doubled(s_doubled)],
            parity_prefactors: Vec::new(),
            with_projections: true,
        };
        let l_states: i32 = (0..=l_max).map(|l| 2 * l + 1).sum();
        let assignments = domains.enumerate();
        prop_assert_eq!(assignments.len() as i32, l_states * (s_doubled + 1));
        prop_assert!(assignments.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
