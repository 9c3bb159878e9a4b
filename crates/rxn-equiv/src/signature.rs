//! Canonical form of a solution graph.
//!
//! Each subtree is written as its edge label followed by the sorted signatures of its
//! children, so structurally symmetric subtrees and relabeled final-state edges produce
//! the same string.

use rxn_core::{EdgeId, NodeId};
use rxn_qn::NodeProperties;
use rxn_solve::{FormalismType, StateTransitionGraph};
use sha2::{Digest, Sha256};

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}

fn edge_label(graph: &StateTransitionGraph, edge: EdgeId) -> String {
    match graph.edge_state(edge) {
        Some(state) => format!(
            "{}@{}",
            state.particle_name().unwrap_or("?"),
            optional(state.qns.spin_projection)
        ),
        None => "?".to_string(),
    }
}

fn node_label(props: Option<&NodeProperties>, formalism: FormalismType) -> String {
    let Some(props) = props else {
        return "?".to_string();
    };
    let qns = props.qns.without(formalism.ignored_node_qns());
    format!(
        "L={}/{},S={}/{},P={}",
        optional(qns.l_magnitude),
        optional(qns.l_projection),
        optional(qns.s_magnitude),
        optional(qns.s_projection),
        optional(qns.parity_prefactor)
    )
}

fn node_signature(graph: &StateTransitionGraph, node: NodeId, formalism: FormalismType) -> String {
    let topology = graph.topology();
    let mut children: Vec<String> = topology
        .outgoing_edges(node)
        .iter()
        .map(|edge| edge_signature(graph, *edge, formalism))
        .collect();
    children.sort();
    format!(
        "[{}]({})",
        node_label(graph.node_properties(node), formalism),
        children.join(",")
    )
}

fn edge_signature(graph: &StateTransitionGraph, edge: EdgeId, formalism: FormalismType) -> String {
    let label = edge_label(graph, edge);
    match graph.topology().edge(edge).ok().and_then(|endpoints| endpoints.ending_node) {
        Some(node) => format!("{label}>{}", node_signature(graph, node, formalism)),
        None => label,
    }
}

/// Canonical string of a solution; equal strings mean equivalent solutions.
///
/// The interaction type of a node is not part of the signature, and neither are the node
/// quantum numbers the formalism ignores.
pub fn canonical_signature(graph: &StateTransitionGraph, formalism: FormalismType) -> String {
    let mut roots: Vec<String> = graph
        .topology()
        .initial_state_edges()
        .into_iter()
        .map(|edge| edge_signature(graph, edge, formalism))
        .collect();
    roots.sort();
    roots.join(";")
}

/// SHA-256 of the canonical signature, hex encoded.
pub fn graph_hash(graph: &StateTransitionGraph, formalism: FormalismType) -> String {
    hex::encode(Sha256::digest(canonical_signature(graph, formalism).as_bytes()))
}
