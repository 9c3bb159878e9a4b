use rxn_qn::EdgeState;

use crate::view::{Side, Violation};

fn mass_and_width(states: &[&EdgeState], side: Side) -> Result<(f64, f64), Violation> {
    let mut mass = 0.0;
    let mut width = 0.0;
    for (pos, state) in states.iter().enumerate() {
        let particle = state
            .particle
            .as_deref()
            .ok_or_else(|| Violation::missing(format!("{side} edge {pos} has no particle")))?;
        mass += particle.mass;
        width += particle.width_or_zero();
    }
    Ok((mass, width))
}

/// `M_out - k W_out < M_in + k W_in`.
pub(crate) fn mass_conservation(
    incoming: &[&EdgeState],
    outgoing: &[&EdgeState],
    width_factor: f64,
) -> Result<(), Violation> {
    let (mass_in, width_in) = mass_and_width(incoming, Side::Incoming)?;
    let (mass_out, width_out) = mass_and_width(outgoing, Side::Outgoing)?;
    if mass_out - width_factor * width_out < mass_in + width_factor * width_in {
        Ok(())
    } else {
        Err(Violation::violated(format!(
            "outgoing mass {mass_out:.6} GeV not below incoming mass {mass_in:.6} GeV"
        )))
    }
}
