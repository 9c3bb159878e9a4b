//! Quick check of which conservation laws forbid a reaction outright.

use std::collections::BTreeSet;
use std::sync::Arc;

use itertools::Itertools;
use rxn_core::{ErrorInfo, ParticleLookup, RxnError};
use rxn_qn::{EdgeState, NodeProperties};
use rxn_rules::{NodeView, Rule, Verdict};
use rxn_solve::{default_interaction_settings, determine_interaction_types};
use rxn_topology::create_nbody_topology;

use crate::config::{ManagerConfig, ReactionRequest};
use crate::facts::resolve_states;

/// Rules that reject a direct transition from the initial to the final state for every
/// spin projection and node quantum number combination.
///
/// The transition is a single node, solved for the strongest interaction type that is
/// both allowed and compatible with the external particles; when none is compatible,
/// the weakest allowed type is used so that the compatibility rule shows up in the set.
/// Scattering reactions skip the mass threshold. Coupling rules (parity, helicity and
/// spin projections through L and S) are only reported when nothing else fails.
pub fn check_reaction_violations(
    lookup: &dyn ParticleLookup,
    request: &ReactionRequest,
    config: &ManagerConfig,
) -> Result<BTreeSet<String>, RxnError> {
    let initial = resolve_states(lookup, &request.initial_state)?;
    let final_state = resolve_states(lookup, &request.final_state)?;
    let topology = create_nbody_topology(initial.len(), final_state.len())?;
    let node = topology.node_ids().next().ok_or_else(|| {
        RxnError::Topology(ErrorInfo::new("empty-topology", "n-body topology has no node"))
    })?;
    let allowed = request.interaction_selection()?;

    let externals: Vec<_> = initial.iter().chain(final_state.iter()).collect();
    let probe: Vec<EdgeState> = externals
        .iter()
        .map(|state| EdgeState::from_particle(Arc::clone(&state.record), state.projections[0]))
        .collect::<Result<_, _>>()?;
    let probe_refs: Vec<&EdgeState> = probe.iter().collect();
    let determined = determine_interaction_types(&probe_refs, &allowed);
    let interaction = determined
        .iter()
        .next()
        .or_else(|| allowed.iter().next_back())
        .copied()
        .ok_or_else(|| {
            RxnError::Config(ErrorInfo::new("no-interaction-types", "no interaction type is allowed"))
        })?;

    let mut settings = default_interaction_settings(
        config.formalism,
        interaction,
        topology.is_two_body_node(node),
        config.mass_width_factor,
    );
    if initial.len() > 1 {
        settings.remove_rule("mass_conservation");
    }
    let node_assignments = settings.node_domains.enumerate();
    let mut violated: BTreeSet<&'static str> = settings.rules().iter().map(|rule| rule.name()).collect();

    let n_initial = initial.len();
    let combinations = externals
        .iter()
        .map(|state| state.projections.iter().copied())
        .multi_cartesian_product();
    'combinations: for projections in combinations {
        let states: Vec<EdgeState> = externals
            .iter()
            .zip(projections)
            .map(|(state, projection)| EdgeState::from_particle(Arc::clone(&state.record), projection))
            .collect::<Result<_, _>>()?;
        let slots: Vec<Option<&EdgeState>> = states.iter().map(Some).collect();
        let (incoming, outgoing) = slots.split_at(n_initial);
        for qns in &node_assignments {
            let properties = NodeProperties {
                interaction_type: Some(interaction),
                qns: *qns,
            };
            let view = NodeView {
                incoming,
                outgoing,
                node: Some(&properties),
            };
            violated.retain(|name| {
                settings
                    .rules()
                    .iter()
                    .filter(|rule| rule.name() == *name)
                    .any(|rule| matches!(rule.evaluate(&view), Verdict::Fail(_)))
            });
            if violated.is_empty() {
                break 'combinations;
            }
        }
    }
    let couplings: BTreeSet<&'static str> = settings
        .rules()
        .iter()
        .filter(|rule| rule.is_coupling_rule())
        .map(Rule::name)
        .collect();
    if violated.iter().any(|name| !couplings.contains(name)) {
        violated.retain(|name| !couplings.contains(name));
    }
    tracing::debug!(
        interaction = %interaction,
        violated = violated.len(),
        "checked reaction violations"
    );
    Ok(violated.into_iter().map(str::to_string).collect())
}
