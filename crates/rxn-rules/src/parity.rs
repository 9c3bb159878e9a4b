use rxn_core::{HalfInteger, Parity};
use rxn_qn::{EdgeState, NodeProperties};

use crate::view::{require, require_node, Side, Violation};

fn parities(states: &[&EdgeState], side: Side) -> Result<Vec<Parity>, Violation> {
    states
        .iter()
        .enumerate()
        .map(|(pos, state)| require(state.qns.parity, "parity", side, pos))
        .collect()
}

fn magnitudes(states: &[&EdgeState], side: Side) -> Result<Vec<HalfInteger>, Violation> {
    states
        .iter()
        .enumerate()
        .map(|(pos, state)| require(state.qns.spin_magnitude, "spin magnitude", side, pos))
        .collect()
}

fn pids(states: &[&EdgeState], side: Side) -> Result<Vec<i64>, Violation> {
    states
        .iter()
        .enumerate()
        .map(|(pos, state)| require(state.qns.pid, "pid", side, pos))
        .collect()
}

fn orbital_sign(node: Option<&NodeProperties>) -> Result<Parity, Violation> {
    let l = require_node(node.and_then(|props| props.qns.l_magnitude), "L magnitude")?;
    Parity::from_half_exponent(l).ok_or_else(|| Violation::violated(format!("L = {l} is not integral")))
}

/// `P_in = P_1 P_2 (-1)^L` for `1 -> 2` nodes; other arities pass.
pub(crate) fn parity_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    if incoming.len() != 1 || outgoing.len() != 2 {
        return Ok(());
    }
    let parent = parities(incoming, Side::Incoming)?[0];
    let daughters = Parity::product(parities(outgoing, Side::Outgoing)?);
    let expected = daughters * orbital_sign(node)?;
    if parent == expected {
        Ok(())
    } else {
        Err(Violation::violated(format!(
            "parity {parent} incoming vs {expected} from daughters and L"
        )))
    }
}

/// Splits a two-body node into its single state and its pair.
pub(crate) fn two_body_split<'a>(
    incoming: &[&'a EdgeState],
    outgoing: &[&'a EdgeState],
) -> Option<(&'a EdgeState, [&'a EdgeState; 2], Side)> {
    match (incoming, outgoing) {
        ([single], [first, second]) => Some((*single, [*first, *second], Side::Outgoing)),
        ([first, second], [single]) => Some((*single, [*first, *second], Side::Incoming)),
        _ => None,
    }
}

/// Relates the helicity amplitude parity prefactor to the intrinsic parities.
pub(crate) fn parity_conservation_helicity(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    let Some((single, pair, pair_side)) = two_body_split(incoming, outgoing) else {
        return Ok(());
    };
    let single_side = match pair_side {
        Side::Incoming => Side::Outgoing,
        Side::Outgoing => Side::Incoming,
    };
    let parent_parity = require(single.qns.parity, "parity", single_side, 0)?;
    let parent_spin = require(single.qns.spin_magnitude, "spin magnitude", single_side, 0)?;
    let pair_parities = parities(&pair, pair_side)?;
    let pair_spins = magnitudes(&pair, pair_side)?;
    let mut helicities = Vec::with_capacity(2);
    for (pos, state) in pair.iter().enumerate() {
        helicities.push(require(state.qns.spin_projection, "spin projection", pair_side, pos)?);
    }
    let expected = require_node(node.and_then(|props| props.qns.parity_prefactor), "parity prefactor")?;

    let exponent = pair_spins[0] + pair_spins[1] - parent_spin;
    let sign = Parity::from_half_exponent(exponent)
        .ok_or_else(|| Violation::violated(format!("spin sum {exponent} is not integral")))?;
    let prefactor = parent_parity * Parity::product(pair_parities) * sign;
    if helicities.iter().all(|h| *h == HalfInteger::ZERO) && prefactor == Parity::Minus {
        return Err(Violation::violated(
            "vanishing helicities require a positive parity prefactor",
        ));
    }
    if prefactor == expected {
        Ok(())
    } else {
        Err(Violation::violated(format!(
            "parity prefactor {prefactor} differs from node value {expected}"
        )))
    }
}

/// C parity of a group of states, if it can be determined.
fn c_parity_of(
    states: &[&EdgeState],
    side: Side,
    node: Option<&NodeProperties>,
) -> Result<Option<Parity>, Violation> {
    let spins = magnitudes(states, side)?;
    let ids = pids(states, side)?;
    if let Some(values) = states.iter().map(|state| state.qns.c_parity).collect::<Option<Vec<_>>>() {
        return Ok(Some(Parity::product(values)));
    }
    if states.len() != 2 || ids[0] != -ids[1] {
        return Ok(None);
    }
    let Some(qns) = node.map(|props| props.qns) else {
        return Ok(None);
    };
    let Some(l) = qns.l_magnitude else {
        return Ok(None);
    };
    if spins[0].is_integer() {
        return Ok(Parity::from_half_exponent(l));
    }
    match qns.s_magnitude {
        Some(s) if s.is_integer() => Ok(Parity::from_half_exponent(l + s)),
        _ => Ok(None),
    }
}

/// C parity is conserved whenever it is defined on both sides.
pub(crate) fn c_parity_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    let c_in = c_parity_of(incoming, Side::Incoming, node)?;
    let c_out = c_parity_of(outgoing, Side::Outgoing, node)?;
    match (c_in, c_out) {
        (Some(c_in), Some(c_out)) if c_in != c_out => Err(Violation::violated(format!(
            "C parity {c_in} incoming vs {c_out} outgoing"
        ))),
        _ => Ok(()),
    }
}

/// G parity is conserved; particle-antiparticle pairs contribute `(-1)^(L+S+I)`.
pub(crate) fn g_parity_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    for (side, states) in [(Side::Incoming, incoming), (Side::Outgoing, outgoing)] {
        for (pos, state) in states.iter().enumerate() {
            require(state.qns.isospin_magnitude, "isospin magnitude", side, pos)?;
            require(state.qns.spin_magnitude, "spin magnitude", side, pos)?;
            require(state.qns.pid, "pid", side, pos)?;
        }
    }
    let g_in: Option<Vec<Parity>> = incoming.iter().map(|state| state.qns.g_parity).collect();
    let g_out: Option<Vec<Parity>> = outgoing.iter().map(|state| state.qns.g_parity).collect();
    if let (Some(g_in), Some(g_out)) = (&g_in, &g_out) {
        let (g_in, g_out) = (Parity::product(g_in.iter().copied()), Parity::product(g_out.iter().copied()));
        return if g_in == g_out {
            Ok(())
        } else {
            Err(Violation::violated(format!("G parity {g_in} incoming vs {g_out} outgoing")))
        };
    }

    let Some((single, pair, _)) = two_body_split(incoming, outgoing) else {
        return Ok(());
    };
    let (Some(single_g), Some(isospin)) = (single.qns.g_parity, single.qns.isospin_magnitude) else {
        return Ok(());
    };
    if pair[0].qns.pid != pair[1].qns.pid.map(|pid| -pid) || !isospin.is_integer() {
        return Ok(());
    }
    let l = require_node(node.and_then(|props| props.qns.l_magnitude), "L magnitude")?;
    let mut exponent = l + isospin;
    if !pair[0].qns.spin_magnitude.unwrap_or_default().is_integer() {
        exponent = exponent + require_node(node.and_then(|props| props.qns.s_magnitude), "S magnitude")?;
    }
    match Parity::from_half_exponent(exponent) {
        Some(expected) if expected == single_g => Ok(()),
        Some(expected) => Err(Violation::violated(format!(
            "G parity {single_g} vs {expected} of the particle-antiparticle pair"
        ))),
        None => Ok(()),
    }
}

/// Identical daughters with equal projections need a symmetric (bosons) or antisymmetric
/// (fermions) state, which fixes the sign of the parent parity.
pub(crate) fn identical_particle_symmetrization(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
) -> Result<(), Violation> {
    if incoming.len() != 1 || outgoing.len() < 2 {
        return Ok(());
    }
    let ids = pids(outgoing, Side::Outgoing)?;
    let spins = magnitudes(outgoing, Side::Outgoing)?;
    let mut projections = Vec::with_capacity(outgoing.len());
    for (pos, state) in outgoing.iter().enumerate() {
        projections.push(require(state.qns.spin_projection, "spin projection", Side::Outgoing, pos)?);
    }
    let identical = ids.windows(2).all(|w| w[0] == w[1]) && projections.windows(2).all(|w| w[0] == w[1]);
    if !identical {
        return Ok(());
    }
    let parent = require(incoming[0].qns.parity, "parity", Side::Incoming, 0)?;
    let forbidden = if spins[0].is_integer() {
        Parity::Minus
    } else {
        Parity::Plus
    };
    if parent == forbidden {
        Err(Violation::violated(format!(
            "identical daughters with equal projections forbid parent parity {parent}"
        )))
    } else {
        Ok(())
    }
}
