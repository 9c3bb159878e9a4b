use rxn_core::{HalfInteger, InteractionType, Spin};
use rxn_qn::{EdgeState, NodeProperties};

use crate::rule::EdgeRule;
use crate::view::{require_node, NodeView, Side, Verdict, Violation};

impl EdgeRule {
    /// Checks a single edge state.
    pub fn check(&self, state: &EdgeState) -> Result<(), Violation> {
        match self {
            EdgeRule::SpinValidity => spin_validity(state),
            EdgeRule::IsospinValidity => isospin_validity(state),
            EdgeRule::GellMannNishijima => gell_mann_nishijima(state),
        }
    }
}

pub(crate) fn evaluate_view(rule: EdgeRule, view: &NodeView<'_>) -> Verdict {
    let mut open = false;
    for (side, position, slot) in view.slots() {
        match slot {
            Some(state) => {
                if let Err(violation) = rule.check(state) {
                    return Verdict::Fail(Violation {
                        kind: violation.kind,
                        reason: format!("{side} edge {position}: {}", violation.reason),
                    });
                }
            }
            None => open = true,
        }
    }
    if open {
        Verdict::Deferred
    } else {
        Verdict::Pass
    }
}

fn spin_validity(state: &EdgeState) -> Result<(), Violation> {
    let magnitude = state
        .qns
        .spin_magnitude
        .ok_or_else(|| Violation::missing("no spin magnitude"))?;
    let projection = state
        .qns
        .spin_projection
        .ok_or_else(|| Violation::missing("no spin projection"))?;
    Spin::new(magnitude, projection)
        .map(|_| ())
        .map_err(|_| Violation::violated(format!("projection {projection} invalid for spin {magnitude}")))
}

fn isospin_validity(state: &EdgeState) -> Result<(), Violation> {
    match (state.qns.isospin_magnitude, state.qns.isospin_projection) {
        (None, None) => Ok(()),
        (Some(magnitude), Some(projection)) => Spin::new(magnitude, projection)
            .map(|_| ())
            .map_err(|_| {
                Violation::violated(format!("projection {projection} invalid for isospin {magnitude}"))
            }),
        _ => Err(Violation::missing("isospin magnitude and projection must come together")),
    }
}

/// `2Q = 2 I3 + B + S + C + B' + T` for hadrons; leptons are exempt.
fn gell_mann_nishijima(state: &EdgeState) -> Result<(), Violation> {
    let qns = &state.qns;
    let is_lepton = [qns.electron_lepton_number, qns.muon_lepton_number, qns.tau_lepton_number]
        .iter()
        .any(|value| value.unwrap_or(0) != 0);
    if is_lepton {
        return Ok(());
    }
    let charge = qns.charge.ok_or_else(|| Violation::missing("no charge"))?;
    let hypercharge = qns.baryon_number.unwrap_or(0)
        + qns.strangeness.unwrap_or(0)
        + qns.charmness.unwrap_or(0)
        + qns.bottomness.unwrap_or(0)
        + qns.topness.unwrap_or(0);
    let doubled_i3 = qns.isospin_projection.unwrap_or(HalfInteger::ZERO).doubled();
    if 2 * charge == doubled_i3 + hypercharge {
        Ok(())
    } else {
        Err(Violation::violated(format!(
            "charge {charge} inconsistent with I3 {} and hypercharge {hypercharge}",
            HalfInteger::from_doubled(doubled_i3)
        )))
    }
}

/// Photons and charged leptons exclude the strong interaction; neutrinos require the weak one.
pub(crate) fn interaction_type_compatibility(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    node: Option<&NodeProperties>,
) -> Result<(), Violation> {
    let interaction = require_node(node.and_then(|props| props.interaction_type), "interaction type")?;
    for (side, states) in [(Side::Incoming, incoming), (Side::Outgoing, outgoing)] {
        for (pos, state) in states.iter().enumerate() {
            let particle = state
                .particle
                .as_deref()
                .ok_or_else(|| Violation::missing(format!("{side} edge {pos} has no particle")))?;
            let allowed = if particle.is_neutrino() {
                interaction == InteractionType::Weak
            } else if particle.is_photon() || particle.is_lepton() {
                interaction != InteractionType::Strong
            } else {
                true
            };
            if !allowed {
                return Err(Violation::violated(format!(
                    "{} cannot couple through the {interaction} interaction",
                    particle.name
                )));
            }
        }
    }
    Ok(())
}
