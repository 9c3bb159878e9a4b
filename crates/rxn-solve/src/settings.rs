//! Per-node interaction settings: the active rules and the domains they search.

use rxn_core::{HalfInteger, InteractionType, Parity};
use rxn_qn::{EdgeQn, EdgeQnDomains, NodeQnDomains};
use rxn_rules::{AdditiveQn, EdgeRule, GraphRule, NodeRule, Rule, RuleCost};
use serde::{Deserialize, Serialize};

use crate::formalism::FormalismType;

/// Rules and candidate domains of one node in one problem set.
///
/// Rules are kept sorted by [`Rule::order_key`] so that cheap rules run first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionSettings {
    /// Interaction type the node is solved for.
    pub interaction_type: InteractionType,
    rules: Vec<Rule>,
    /// Domains intermediate edges attached to the node must respect.
    pub edge_domains: EdgeQnDomains,
    /// Domains of the node quantum numbers.
    pub node_domains: NodeQnDomains,
}

impl InteractionSettings {
    /// Creates settings; the rules are sorted into evaluation order.
    pub fn new(
        interaction_type: InteractionType,
        rules: impl IntoIterator<Item = Rule>,
        edge_domains: EdgeQnDomains,
        node_domains: NodeQnDomains,
    ) -> Self {
        let mut settings = Self {
            interaction_type,
            rules: Vec::new(),
            edge_domains,
            node_domains,
        };
        for rule in rules {
            settings.add_rule(rule);
        }
        settings
    }

    /// Relative strength of the interaction type.
    pub fn strength(&self) -> f64 {
        self.interaction_type.strength()
    }

    /// All rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Stable names of the active rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Single-edge rules, used to pre-filter intermediate candidates.
    pub fn edge_rules(&self) -> impl Iterator<Item = EdgeRule> + '_ {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Edge(rule) => Some(*rule),
            _ => None,
        })
    }

    /// Rules that need the completed graph.
    pub fn graph_rules(&self) -> impl Iterator<Item = &Rule> + '_ {
        self.rules.iter().filter(|rule| rule.cost() == RuleCost::Graph)
    }

    /// Adds a rule unless a rule with the same name is active; keeps evaluation order.
    pub fn add_rule(&mut self, rule: Rule) {
        if self.rules.iter().any(|known| known.name() == rule.name()) {
            return;
        }
        let position = self
            .rules
            .partition_point(|known| known.order_key() <= rule.order_key());
        self.rules.insert(position, rule);
    }

    /// Removes the rule with the given name; returns `true` if it was active.
    pub fn remove_rule(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|rule| rule.name() != name);
        self.rules.len() != before
    }
}

/// Domains candidate intermediate states must fall into.
pub fn default_edge_domains() -> EdgeQnDomains {
    let half = HalfInteger::from_doubled;
    EdgeQnDomains::new()
        .with_int_range(EdgeQn::Charge, -2, 2)
        .with_int_range(EdgeQn::BaryonNumber, -1, 1)
        .with_int_range(EdgeQn::ElectronLeptonNumber, -1, 1)
        .with_int_range(EdgeQn::MuonLeptonNumber, -1, 1)
        .with_int_range(EdgeQn::TauLeptonNumber, -1, 1)
        .with_int_range(EdgeQn::Strangeness, -3, 3)
        .with_int_range(EdgeQn::Charmness, -1, 1)
        .with_int_range(EdgeQn::Bottomness, -1, 1)
        .with_parities(EdgeQn::Parity)
        .with_parities(EdgeQn::CParity)
        .with_parities(EdgeQn::GParity)
        .with_half_range(EdgeQn::SpinMagnitude, HalfInteger::ZERO, half(8))
        .with_half_range(EdgeQn::IsospinMagnitude, HalfInteger::ZERO, half(3))
        .with_half_range(EdgeQn::IsospinProjection, half(-3), half(3))
}

fn two_body_node_domains(formalism: FormalismType, interaction: InteractionType) -> NodeQnDomains {
    let parity_prefactors = if formalism.is_helicity_based() && interaction != InteractionType::Weak {
        Parity::ALL.to_vec()
    } else {
        Vec::new()
    };
    NodeQnDomains {
        l_magnitudes: HalfInteger::unit_range(HalfInteger::ZERO, HalfInteger::from_int(2)),
        s_magnitudes: HalfInteger::half_range(HalfInteger::ZERO, HalfInteger::from_int(2)),
        parity_prefactors,
        with_projections: formalism == FormalismType::Canonical,
    }
}

fn spin_rules(formalism: FormalismType, two_body: bool) -> Vec<Rule> {
    if !two_body {
        return vec![Rule::Node(NodeRule::SpinMagnitude)];
    }
    match formalism {
        FormalismType::Helicity => vec![
            Rule::Node(NodeRule::SpinMagnitude),
            Rule::Node(NodeRule::Helicity),
        ],
        FormalismType::CanonicalHelicity => vec![
            Rule::Node(NodeRule::SpinMagnitude),
            Rule::Node(NodeRule::Helicity),
            Rule::Node(NodeRule::ClebschGordanHelicityToCanonical),
        ],
        FormalismType::Canonical => vec![Rule::Node(NodeRule::Spin)],
    }
}

/// Builds the standard settings for a node.
///
/// Weaker interactions conserve fewer quantum numbers: EM adds flavour, parity and C
/// parity on top of the weak set, and strong adds isospin and G parity.
pub fn default_interaction_settings(
    formalism: FormalismType,
    interaction: InteractionType,
    two_body: bool,
    width_factor: f64,
) -> InteractionSettings {
    let mut rules = vec![
        Rule::Edge(EdgeRule::SpinValidity),
        Rule::Edge(EdgeRule::IsospinValidity),
        Rule::Edge(EdgeRule::GellMannNishijima),
        Rule::Node(NodeRule::InteractionTypeCompatibility),
        Rule::Node(NodeRule::Additive(AdditiveQn::Charge)),
        Rule::Node(NodeRule::Additive(AdditiveQn::BaryonNumber)),
        Rule::Node(NodeRule::Additive(AdditiveQn::ElectronLeptonNumber)),
        Rule::Node(NodeRule::Additive(AdditiveQn::MuonLeptonNumber)),
        Rule::Node(NodeRule::Additive(AdditiveQn::TauLeptonNumber)),
        Rule::Node(NodeRule::IdenticalParticleSymmetrization),
        Rule::Graph(GraphRule::MassConservation { width_factor }),
    ];
    rules.extend(spin_rules(formalism, two_body));
    if interaction <= InteractionType::Em {
        rules.extend([
            Rule::Node(NodeRule::Additive(AdditiveQn::Strangeness)),
            Rule::Node(NodeRule::Additive(AdditiveQn::Charmness)),
            Rule::Node(NodeRule::Additive(AdditiveQn::Bottomness)),
            Rule::Node(NodeRule::Parity),
            Rule::Node(NodeRule::CParity),
        ]);
        if two_body && formalism.is_helicity_based() {
            rules.push(Rule::Node(NodeRule::ParityHelicity));
        }
    }
    if interaction == InteractionType::Strong {
        rules.extend([Rule::Node(NodeRule::Isospin), Rule::Node(NodeRule::GParity)]);
    }
    let node_domains = if two_body {
        two_body_node_domains(formalism, interaction)
    } else {
        NodeQnDomains::empty()
    };
    InteractionSettings::new(interaction, rules, default_edge_domains(), node_domains)
}
