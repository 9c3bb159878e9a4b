use std::fmt::{self, Display};

use rxn_qn::{EdgeQn, EdgeState, NodeProperties};
use serde::{Deserialize, Serialize};

use crate::view::{NodeView, Verdict, Violation};
use crate::{additive, edge, graph, parity, spin};

/// Cost class; cheaper classes run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCost {
    /// Depends on a single edge.
    Edge,
    /// Depends on the edges adjacent to one node.
    Node,
    /// Needs the completed graph.
    Graph,
}

/// Additively conserved quantum numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdditiveQn {
    /// Electric charge.
    Charge,
    /// Baryon number.
    BaryonNumber,
    /// Electron lepton number.
    ElectronLeptonNumber,
    /// Muon lepton number.
    MuonLeptonNumber,
    /// Tau lepton number.
    TauLeptonNumber,
    /// Strangeness.
    Strangeness,
    /// Charm.
    Charmness,
    /// Bottomness.
    Bottomness,
}

impl AdditiveQn {
    /// Returns the edge quantum number the rule sums.
    pub fn edge_qn(self) -> EdgeQn {
        match self {
            AdditiveQn::Charge => EdgeQn::Charge,
            AdditiveQn::BaryonNumber => EdgeQn::BaryonNumber,
            AdditiveQn::ElectronLeptonNumber => EdgeQn::ElectronLeptonNumber,
            AdditiveQn::MuonLeptonNumber => EdgeQn::MuonLeptonNumber,
            AdditiveQn::TauLeptonNumber => EdgeQn::TauLeptonNumber,
            AdditiveQn::Strangeness => EdgeQn::Strangeness,
            AdditiveQn::Charmness => EdgeQn::Charmness,
            AdditiveQn::Bottomness => EdgeQn::Bottomness,
        }
    }
}

/// Rules that inspect one edge at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRule {
    /// Spin projection reachable from the magnitude.
    SpinValidity,
    /// Isospin projection reachable from the magnitude.
    IsospinValidity,
    /// `Q = I3 + Y/2` for hadrons.
    GellMannNishijima,
}

/// Rules over the edges adjacent to one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRule {
    /// Photons and leptons restrict the interaction type.
    InteractionTypeCompatibility,
    /// Sum over incoming equals sum over outgoing.
    Additive(AdditiveQn),
    /// Identical bosons (fermions) need a symmetric (antisymmetric) state.
    IdenticalParticleSymmetrization,
    /// Parity with orbital angular momentum, two-body nodes.
    Parity,
    /// Parity prefactor of helicity amplitudes, two-body nodes.
    ParityHelicity,
    /// C parity including particle-antiparticle pairs.
    CParity,
    /// G parity including particle-antiparticle pairs.
    GParity,
    /// Helicity difference bounded by the parent spin.
    Helicity,
    /// Spin magnitudes couple through L and S.
    SpinMagnitude,
    /// Isospin couples and its projection is conserved.
    Isospin,
    /// Spins with projections couple through L and S.
    Spin,
    /// Clebsch-Gordan coefficients of the helicity to canonical basis change.
    ClebschGordanHelicityToCanonical,
}

/// Rules that need the completed graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphRule {
    /// Daughters must be lighter than the parent, with widths scaled by `width_factor`.
    MassConservation {
        /// Multiplier applied to widths on both sides.
        width_factor: f64,
    },
}

/// A conservation rule; a closed set evaluated through [`Rule::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Single-edge rule.
    Edge(EdgeRule),
    /// Node-local rule.
    Node(NodeRule),
    /// Completed-graph rule.
    Graph(GraphRule),
}

impl Rule {
    /// Returns the stable snake_case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Edge(EdgeRule::SpinValidity) => "spin_validity",
            Rule::Edge(EdgeRule::IsospinValidity) => "isospin_validity",
            Rule::Edge(EdgeRule::GellMannNishijima) => "gell_mann_nishijima",
            Rule::Node(rule) => match rule {
                NodeRule::InteractionTypeCompatibility => "interaction_type_compatibility",
                NodeRule::Additive(qn) => match qn {
                    AdditiveQn::Charge => "charge_conservation",
                    AdditiveQn::BaryonNumber => "baryon_number_conservation",
                    AdditiveQn::ElectronLeptonNumber => "electron_ln_conservation",
                    AdditiveQn::MuonLeptonNumber => "muon_ln_conservation",
                    AdditiveQn::TauLeptonNumber => "tau_ln_conservation",
                    AdditiveQn::Strangeness => "strangeness_conservation",
                    AdditiveQn::Charmness => "charm_conservation",
                    AdditiveQn::Bottomness => "bottomness_conservation",
                },
                NodeRule::IdenticalParticleSymmetrization => "identical_particle_symmetrization",
                NodeRule::Parity => "parity_conservation",
                NodeRule::ParityHelicity => "parity_conservation_helicity",
                NodeRule::CParity => "c_parity_conservation",
                NodeRule::GParity => "g_parity_conservation",
                NodeRule::Helicity => "helicity_conservation",
                NodeRule::SpinMagnitude => "spin_magnitude_conservation",
                NodeRule::Isospin => "isospin_conservation",
                NodeRule::Spin => "spin_conservation",
                NodeRule::ClebschGordanHelicityToCanonical => "clebsch_gordan_helicity_to_canonical",
            },
            Rule::Graph(GraphRule::MassConservation { .. }) => "mass_conservation",
        }
    }

    /// Returns the cost class.
    pub fn cost(&self) -> RuleCost {
        match self {
            Rule::Edge(_) => RuleCost::Edge,
            Rule::Node(_) => RuleCost::Node,
            Rule::Graph(_) => RuleCost::Graph,
        }
    }

    /// Returns the evaluation order key: cost class first, then a rough per-rule cost.
    pub fn order_key(&self) -> (RuleCost, u8) {
        let rank = match self {
            Rule::Edge(EdgeRule::SpinValidity) => 0,
            Rule::Edge(EdgeRule::IsospinValidity) => 1,
            Rule::Edge(EdgeRule::GellMannNishijima) => 2,
            Rule::Node(NodeRule::InteractionTypeCompatibility) => 0,
            Rule::Node(NodeRule::Additive(_)) => 1,
            Rule::Node(NodeRule::IdenticalParticleSymmetrization) => 2,
            Rule::Node(NodeRule::Parity) => 3,
            Rule::Node(NodeRule::CParity) => 4,
            Rule::Node(NodeRule::GParity) => 5,
            Rule::Node(NodeRule::ParityHelicity) => 6,
            Rule::Node(NodeRule::Helicity) => 7,
            Rule::Node(NodeRule::SpinMagnitude) => 8,
            Rule::Node(NodeRule::Isospin) => 9,
            Rule::Node(NodeRule::Spin) => 10,
            Rule::Node(NodeRule::ClebschGordanHelicityToCanonical) => 11,
            Rule::Graph(_) => 0,
        };
        (self.cost(), rank)
    }

    /// Returns `true` if the rule reads node quantum numbers.
    pub fn uses_node_qns(&self) -> bool {
        matches!(
            self,
            Rule::Node(
                NodeRule::Parity
                    | NodeRule::ParityHelicity
                    | NodeRule::CParity
                    | NodeRule::GParity
                    | NodeRule::SpinMagnitude
                    | NodeRule::Spin
                    | NodeRule::ClebschGordanHelicityToCanonical
            )
        )
    }

    /// Returns `true` for the rules tying parity, helicities and spin projections to the
    /// orbital and spin couplings of a two-body node.
    pub fn is_coupling_rule(&self) -> bool {
        matches!(
            self,
            Rule::Node(
                NodeRule::Parity
                    | NodeRule::ParityHelicity
                    | NodeRule::Helicity
                    | NodeRule::Spin
                    | NodeRule::ClebschGordanHelicityToCanonical
            )
        )
    }

    /// Evaluates the rule on a node view.
    ///
    /// Unresolved edges make most rules [`Verdict::Deferred`]; additive rules narrow a
    /// single open edge with [`Verdict::Restrict`].
    pub fn evaluate(&self, view: &NodeView<'_>) -> Verdict {
        match self {
            Rule::Edge(rule) => edge::evaluate_view(*rule, view),
            Rule::Node(NodeRule::Additive(qn)) => additive::evaluate(*qn, view),
            Rule::Node(rule) => on_resolved(view, |incoming, outgoing, node| match rule {
                NodeRule::InteractionTypeCompatibility => {
                    edge::interaction_type_compatibility(incoming, outgoing, node)
                }
                NodeRule::IdenticalParticleSymmetrization => {
                    parity::identical_particle_symmetrization(incoming, outgoing)
                }
                NodeRule::Parity => parity::parity_conservation(incoming, outgoing, node),
                NodeRule::ParityHelicity => parity::parity_conservation_helicity(incoming, outgoing, node),
                NodeRule::CParity => parity::c_parity_conservation(incoming, outgoing, node),
                NodeRule::GParity => parity::g_parity_conservation(incoming, outgoing, node),
                NodeRule::Helicity => spin::helicity_conservation(incoming, outgoing),
                NodeRule::SpinMagnitude => spin::spin_magnitude_conservation(incoming, outgoing, node),
                NodeRule::Isospin => spin::isospin_conservation(incoming, outgoing),
                NodeRule::Spin => spin::spin_conservation(incoming, outgoing, node),
                NodeRule::ClebschGordanHelicityToCanonical => {
                    spin::clebsch_gordan_helicity_to_canonical(incoming, outgoing, node)
                }
                NodeRule::Additive(_) => Ok(()),
            }),
            Rule::Graph(GraphRule::MassConservation { width_factor }) => {
                on_resolved(view, |incoming, outgoing, _| {
                    graph::mass_conservation(incoming, outgoing, *width_factor)
                })
            }
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn on_resolved<F>(view: &NodeView<'_>, check: F) -> Verdict
where
    F: FnOnce(&[&EdgeState], &[&EdgeState], Option<&NodeProperties>) -> Result<(), Violation>,
{
    match view.resolved() {
        Some((incoming, outgoing)) => check(&incoming, &outgoing, view.node).into(),
        None => Verdict::Deferred,
    }
}
