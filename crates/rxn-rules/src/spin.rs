//! Angular momentum and isospin coupling rules.
//!
//! Couplings enumerate `|j1 - j2| ..= j1 + j2` and drop states whose Clebsch-Gordan
//! coefficient vanishes by symmetry.

use std::collections::BTreeSet;

use rxn_core::{HalfInteger, Spin};
use rxn_qn::{EdgeState, NodeProperties};

use crate::parity::two_body_split;
use crate::view::{require, require_node, Side, Violation};

/// Returns `true` when `<j1 m1 j2 m2 | J M>` vanishes by a symmetry selection rule.
pub fn is_clebsch_gordan_zero(first: Spin, second: Spin, coupled: Spin) -> bool {
    let (j1, m1) = (first.magnitude(), first.projection());
    let (j2, m2) = (second.magnitude(), second.projection());
    let (j, m) = (coupled.magnitude(), coupled.projection());
    if (j1 == j2 && m1 == m2) || (m1 == HalfInteger::ZERO && m2 == HalfInteger::ZERO) {
        if (j - j1 - j2).abs().is_odd_integer() {
            return true;
        }
    }
    if j1 == j && m1 == -m && (j2 - j1 - j).abs().is_odd_integer() {
        return true;
    }
    if j2 == j && m2 == -m && (j1 - j2 - j).abs().is_odd_integer() {
        return true;
    }
    false
}

/// Couples two spins with projections into all non-vanishing total spins.
pub fn couple_spins(first: Spin, second: Spin) -> Vec<Spin> {
    let projection = first.projection() + second.projection();
    HalfInteger::unit_range(
        (first.magnitude() - second.magnitude()).abs(),
        first.magnitude() + second.magnitude(),
    )
    .into_iter()
    .filter(|magnitude| *magnitude >= projection.abs())
    .filter_map(|magnitude| Spin::new(magnitude, projection).ok())
    .filter(|coupled| !is_clebsch_gordan_zero(first, second, *coupled))
    .collect()
}

/// Couples a list of spins pairwise, last to first.
pub fn couple_spin_list(spins: &[Spin]) -> BTreeSet<Spin> {
    let Some((last, rest)) = spins.split_last() else {
        return BTreeSet::new();
    };
    let mut coupled = BTreeSet::from([*last]);
    for spin in rest.iter().rev() {
        coupled = coupled
            .iter()
            .flat_map(|partial| couple_spins(*partial, *spin))
            .collect();
    }
    coupled
}

/// Couples two magnitudes ignoring projections.
pub fn couple_magnitudes(first: HalfInteger, second: HalfInteger) -> Vec<HalfInteger> {
    HalfInteger::unit_range((first - second).abs(), first + second)
}

/// Couples a list of magnitudes ignoring projections.
pub fn couple_magnitude_list(magnitudes: &[HalfInteger]) -> BTreeSet<HalfInteger> {
    let Some((last, rest)) = magnitudes.split_last() else {
        return BTreeSet::new();
    };
    let mut coupled = BTreeSet::from([*last]);
    for magnitude in rest.iter().rev() {
        coupled = coupled
            .iter()
            .flat_map(|partial| couple_magnitudes(*partial, *magnitude))
            .collect();
    }
    coupled
}

fn edge_spins(states: &[&EdgeState], side: Side) -> Result<Vec<Spin>, Violation> {
    states
        .iter()
        .enumerate()
        .map(|(pos, state)| {
            let magnitude = require(state.qns.spin_magnitude, "spin magnitude", side, pos)?;
            let projection = require(state.qns.spin_projection, "spin projection", side, pos)?;
            Spin::new(magnitude, projection)
                .map_err(|_| Violation::violated(format!("{side} edge {pos} has an invalid spin")))
        })
        .collect()
}

fn edge_magnitudes(states: &[&EdgeState], side: Side) -> Result<Vec<HalfInteger>, Violation> {
    states
        .iter()
        .enumerate()
        .map(|(pos, state)| require(state.qns.spin_magnitude, "spin magnitude", side, pos))
        .collect()
}

fn edge_isospins(states: &[&EdgeState], side: Side) -> Result<Vec<Spin>, Violation> {
    states
        .iter()
        .enumerate()
        .map(|(pos, state)| {
            let magnitude = require(state.qns.isospin_magnitude, "isospin magnitude", side, pos)?;
            let projection = require(state.qns.isospin_projection, "isospin projection", side, pos)?;
            Spin::new(magnitude, projection)
                .map_err(|_| Violation::violated(format!("{side} edge {pos} has an invalid isospin")))
        })
        .collect()
}

/// Total spins of one side; a multi-particle side must couple to `S`, then `S` with `L`.
fn total_spins(spins: &[Spin], ls: Option<(Spin, Spin)>) -> BTreeSet<Spin> {
    if let [single] = spins {
        return BTreeSet::from([*single]);
    }
    let coupled = couple_spin_list(spins);
    match ls {
        Some((l, s)) if coupled.contains(&s) => couple_spins(s, l).into_iter().collect(),
        Some(_) => BTreeSet::new(),
        None => coupled,
    }
}

fn total_magnitudes(magnitudes: &[HalfInteger], ls: (HalfInteger, HalfInteger)) -> BTreeSet<HalfInteger> {
    if let [single] = magnitudes {
        return BTreeSet::from([*single]);
    }
    let (l, s) = ls;
    if couple_magnitude_list(magnitudes).contains(&s) {
        couple_magnitudes(s, l).into_iter().collect()
    } else {
        BTreeSet::new()
    }
}

fn is_two_body(incoming: &[&EdgeState], outgoing: &[&EdgeState]) -> bool {
    matches!((incoming.len(), outgoing.len()), (1, 2) | (2, 1))
}

fn same_integrality(incoming: &[HalfInteger], outgoing: &[HalfInteger]) -> Result<(), Violation> {
    let sum_in: HalfInteger = incoming.iter().copied().sum();
    let sum_out: HalfInteger = outgoing.iter().copied().sum();
    if sum_in.is_integer() == sum_out.is_integer() {
        Ok(())
    } else {
        Err(Violation::violated(format!(
            "spin sums {sum_in} and {sum_out} differ in integrality"
        )))
    }
}

/// Spin magnitudes couple through `S` and `L` at two-body nodes; n-body nodes only need
/// matching integrality.
pub(crate) fn spin_magnitude_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    let spins_in = edge_magnitudes(incoming, Side::Incoming)?;
    let spins_out = edge_magnitudes(outgoing, Side::Outgoing)?;
    if !is_two_body(incoming, outgoing) {
        return same_integrality(&spins_in, &spins_out);
    }
    let qns = node.map(|props| props.qns);
    let l = require_node(qns.and_then(|q| q.l_magnitude), "L magnitude")?;
    let s = require_node(qns.and_then(|q| q.s_magnitude), "S magnitude")?;
    let total_in = total_magnitudes(&spins_in, (l, s));
    let total_out = total_magnitudes(&spins_out, (l, s));
    if total_in.is_disjoint(&total_out) {
        Err(Violation::violated(format!("no common total spin with L = {l}, S = {s}")))
    } else {
        Ok(())
    }
}

/// Spins with projections couple through `S` and `L` at two-body nodes.
pub(crate) fn spin_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    let spins_in = edge_spins(incoming, Side::Incoming)?;
    let spins_out = edge_spins(outgoing, Side::Outgoing)?;
    if !is_two_body(incoming, outgoing) {
        let magnitudes_in: Vec<HalfInteger> = spins_in.iter().map(Spin::magnitude).collect();
        let magnitudes_out: Vec<HalfInteger> = spins_out.iter().map(Spin::magnitude).collect();
        return same_integrality(&magnitudes_in, &magnitudes_out);
    }
    let qns = require_node(node.map(|props| props.qns), "quantum numbers")?;
    require_node(qns.l_projection, "L projection")?;
    require_node(qns.s_projection, "S projection")?;
    let l = qns
        .l_spin()
        .ok_or_else(|| Violation::violated("L projection exceeds its magnitude"))?;
    let s = qns
        .s_spin()
        .ok_or_else(|| Violation::violated("S projection exceeds its magnitude"))?;
    let total_in = total_spins(&spins_in, Some((l, s)));
    let total_out = total_spins(&spins_out, Some((l, s)));
    if total_in.is_disjoint(&total_out) {
        Err(Violation::violated(format!("no common total spin with L = {l}, S = {s}")))
    } else {
        Ok(())
    }
}

/// The parent spin bounds the helicity difference of a two-body pair.
pub(crate) fn helicity_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
) -> Result<(), Violation> {
    let Some((single, pair, pair_side)) = two_body_split(incoming, outgoing) else {
        return Ok(());
    };
    let single_side = match pair_side {
        Side::Incoming => Side::Outgoing,
        Side::Outgoing => Side::Incoming,
    };
    let parent = require(single.qns.spin_magnitude, "spin magnitude", single_side, 0)?;
    let first = require(pair[0].qns.spin_projection, "spin projection", pair_side, 0)?;
    let second = require(pair[1].qns.spin_projection, "spin projection", pair_side, 1)?;
    if parent >= (first - second).abs() {
        Ok(())
    } else {
        Err(Violation::violated(format!(
            "helicity difference {} exceeds parent spin {parent}",
            (first - second).abs()
        )))
    }
}

/// Clebsch-Gordan selection rules of the helicity to canonical basis change.
pub(crate) fn clebsch_gordan_helicity_to_canonical(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    let Some((single, pair, pair_side)) = two_body_split(incoming, outgoing) else {
        return Ok(());
    };
    let pair_spins = edge_spins(&pair, pair_side)?;
    let single_side = match pair_side {
        Side::Incoming => Side::Outgoing,
        Side::Outgoing => Side::Incoming,
    };
    let parent = require(single.qns.spin_magnitude, "spin magnitude", single_side, 0)?;
    let qns = require_node(node.map(|props| props.qns), "quantum numbers")?;
    let l_magnitude = require_node(qns.l_magnitude, "L magnitude")?;
    let s_magnitude = require_node(qns.s_magnitude, "S magnitude")?;

    let first = pair_spins[0];
    let second = Spin::new(pair_spins[1].magnitude(), -pair_spins[1].projection())
        .map_err(|_| Violation::violated("invalid daughter spin"))?;
    let helicity_difference = first.projection() + second.projection();
    let l = Spin::new(l_magnitude, qns.l_projection.unwrap_or_default())
        .map_err(|_| Violation::violated("L projection exceeds its magnitude"))?;
    let (Ok(coupled), Ok(parent)) = (
        Spin::new(s_magnitude, helicity_difference),
        Spin::new(parent, helicity_difference),
    ) else {
        return Err(Violation::violated(format!(
            "helicity difference {helicity_difference} does not fit S = {s_magnitude} and J = {parent}"
        )));
    };
    if is_clebsch_gordan_zero(first, second, coupled) {
        return Err(Violation::violated("daughter spins cannot couple to S"));
    }
    if is_clebsch_gordan_zero(l, coupled, parent) {
        return Err(Violation::violated("L and S cannot couple to the parent spin"));
    }
    Ok(())
}

/// Isospin projection is additive and isospin magnitudes must couple.
pub(crate) fn isospin_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
) -> Result<(), Violation> {
    let isospins_in = edge_isospins(incoming, Side::Incoming)?;
    let isospins_out = edge_isospins(outgoing, Side::Outgoing)?;
    let projection_in: HalfInteger = isospins_in.iter().map(Spin::projection).sum();
    let projection_out: HalfInteger = isospins_out.iter().map(Spin::projection).sum();
    if projection_in != projection_out {
        return Err(Violation::violated(format!(
            "isospin projection {projection_in} incoming vs {projection_out} outgoing"
        )));
    }
    let total_in = total_spins(&isospins_in, None);
    let total_out = total_spins(&isospins_out, None);
    if total_in.is_disjoint(&total_out) {
        Err(Violation::violated("isospins do not couple"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spin(doubled_magnitude: i32, doubled_projection: i32) -> Spin {
        Spin::new(
            HalfInteger::from_doubled(doubled_magnitude),
            HalfInteger::from_doubled(doubled_projection),
        )
        .unwrap()
    }

    #[test]
    fn two_isovectors_at_zero_projection_skip_odd_total() {
        let coupled = couple_spins(spin(2, 0), spin(2, 0));
        let magnitudes: Vec<i32> = coupled.iter().map(|s| s.magnitude().doubled()).collect();
        assert_eq!(magnitudes, vec![0, 4]);
    }

    #[test]
    fn coupling_list_of_three_photons_contains_zero() {
        let photons = [spin(2, 2), spin(2, -2), spin(2, 0)];
        assert!(couple_spin_list(&photons).iter().any(|s| s.magnitude() == HalfInteger::ZERO));
    }
}
