use rxn_core::NodeId;
use sha2::{Digest, Sha256};

use crate::topology::Topology;

/// Computes a hash that is invariant under relabeling of nodes and edges.
///
/// Two topologies share a hash exactly when they have the same tree shape, counting
/// initial-state fusion and n-body vertices.
pub fn structural_hash(topology: &Topology) -> String {
    let mut hasher = Sha256::new();
    hasher.update(structural_signature(topology).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Returns the canonical sorted-child signature the hash is computed from.
pub fn structural_signature(topology: &Topology) -> String {
    let mut roots: Vec<String> = topology
        .node_ids()
        .filter(|node| {
            topology.incoming_edges(*node).iter().all(|edge| {
                topology
                    .edge(*edge)
                    .map_or(false, |endpoints| endpoints.originating_node.is_none())
            })
        })
        .map(|node| node_signature(topology, node))
        .collect();
    roots.sort();
    roots.join("|")
}

fn node_signature(topology: &Topology, node: NodeId) -> String {
    let external_in = topology
        .incoming_edges(node)
        .iter()
        .filter(|edge| matches!(topology.edge(**edge), Ok(e) if e.originating_node.is_none()))
        .count();
    let mut children: Vec<String> = topology
        .outgoing_edges(node)
        .iter()
        .map(|edge| match topology.edge(*edge).ok().and_then(|e| e.ending_node) {
            Some(next) => node_signature(topology, next),
            None => "f".to_string(),
        })
        .collect();
    children.sort();
    format!("{external_in}({})", children.join(","))
}
