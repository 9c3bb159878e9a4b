use std::collections::{BTreeSet, VecDeque};

use rxn_core::{EdgeId, ErrorInfo, NodeId, RxnError};
use serde::{Deserialize, Serialize};

use crate::hash::structural_hash;
use crate::topology::{Topology, TopologyDraft};

/// Selects which topology families [`build_topologies`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyOpts {
    /// Emit all isobar (sequential two-body) trees.
    #[serde(default = "default_true")]
    pub isobar: bool,
    /// Emit the single n-body node topology.
    #[serde(default)]
    pub nbody: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TopologyOpts {
    fn default() -> Self {
        Self {
            isobar: true,
            nbody: false,
        }
    }
}

/// Unlabeled rooted binary tree; leaves are final-state edges.
#[derive(Debug, Clone)]
enum Shape {
    Leaf,
    Split(Box<Shape>, Box<Shape>),
}

fn invalid_request(message: &str, n_initial: usize, n_final: usize) -> RxnError {
    RxnError::Topology(
        ErrorInfo::new("invalid-topology-request", message)
            .with_context("initial_states", n_initial.to_string())
            .with_context("final_states", n_final.to_string()),
    )
}

fn validate_request(n_initial: usize, n_final: usize) -> Result<(), RxnError> {
    if n_initial == 0 {
        return Err(invalid_request("at least one initial state is required", n_initial, n_final));
    }
    if n_final == 0 {
        return Err(invalid_request("at least one final state is required", n_initial, n_final));
    }
    if u32::try_from(2 * (n_initial + n_final)).is_err() {
        return Err(invalid_request("state count exceeds identifier range", n_initial, n_final));
    }
    Ok(())
}

/// Enumerates the distinct unlabeled binary trees with `leaves` leaves.
///
/// Children are kept in a canonical order (larger subtree first, then by index in the
/// table of equally sized shapes), so every isomorphism class appears exactly once.
fn enumerate_shapes(leaves: usize) -> Vec<Shape> {
    let mut table: Vec<Vec<Shape>> = vec![Vec::new(), vec![Shape::Leaf]];
    for size in 2..=leaves {
        let mut shapes = Vec::new();
        for left_size in (size.div_ceil(2)..size).rev() {
            let right_size = size - left_size;
            for (left_idx, left) in table[left_size].iter().enumerate() {
                for (right_idx, right) in table[right_size].iter().enumerate() {
                    if left_size == right_size && right_idx < left_idx {
                        continue;
                    }
                    shapes.push(Shape::Split(Box::new(left.clone()), Box::new(right.clone())));
                }
            }
        }
        table.push(shapes);
    }
    table.swap_remove(leaves)
}

/// Lays out a tree shape: initial edges first, then final edges, then intermediate edges,
/// with nodes and leaves numbered breadth-first from the root.
fn layout(shape: &Shape, n_initial: usize, n_final: usize) -> Result<Topology, RxnError> {
    let mut draft = TopologyDraft::new();
    let initial: Vec<EdgeId> = (0..n_initial).map(|_| draft.add_edge()).collect();
    let finals: Vec<EdgeId> = (0..n_final).map(|_| draft.add_edge()).collect();
    let mut next_final = finals.into_iter();

    let first = draft.add_node();
    for edge in &initial {
        draft.attach_incoming(*edge, first)?;
    }
    let root = if n_initial > 1 && matches!(shape, Shape::Split(..)) {
        let link = draft.add_edge();
        draft.attach_outgoing(link, first)?;
        let root = draft.add_node();
        draft.attach_incoming(link, root)?;
        root
    } else {
        first
    };

    let mut queue: VecDeque<(&Shape, NodeId)> = VecDeque::new();
    match shape {
        Shape::Leaf => {
            let edge = next_final
                .next()
                .ok_or_else(|| invalid_request("shape has more leaves than final states", n_initial, n_final))?;
            draft.attach_outgoing(edge, root)?;
        }
        Shape::Split(..) => queue.push_back((shape, root)),
    }

    while let Some((current, node)) = queue.pop_front() {
        let Shape::Split(left, right) = current else {
            continue;
        };
        for child in [left.as_ref(), right.as_ref()] {
            match child {
                Shape::Leaf => {
                    let edge = next_final.next().ok_or_else(|| {
                        invalid_request("shape has more leaves than final states", n_initial, n_final)
                    })?;
                    draft.attach_outgoing(edge, node)?;
                }
                Shape::Split(..) => {
                    let edge = draft.add_edge();
                    let daughter = draft.add_node();
                    draft.attach_outgoing(edge, node)?;
                    draft.attach_incoming(edge, daughter)?;
                    queue.push_back((child, daughter));
                }
            }
        }
    }
    draft.freeze()
}

/// Builds every distinct isobar topology for `n_initial -> n_final`.
///
/// Several initial states first fuse at a single node. A single final state yields one
/// `n_initial -> 1` node.
pub fn create_isobar_topologies(n_initial: usize, n_final: usize) -> Result<Vec<Topology>, RxnError> {
    validate_request(n_initial, n_final)?;
    let topologies = enumerate_shapes(n_final)
        .iter()
        .map(|shape| layout(shape, n_initial, n_final))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(n_initial, n_final, count = topologies.len(), "built isobar topologies");
    Ok(topologies)
}

/// Builds the topology with a single `n_initial -> n_final` node.
pub fn create_nbody_topology(n_initial: usize, n_final: usize) -> Result<Topology, RxnError> {
    validate_request(n_initial, n_final)?;
    let mut draft = TopologyDraft::new();
    let node = draft.add_node();
    for _ in 0..n_initial {
        let edge = draft.add_edge();
        draft.attach_incoming(edge, node)?;
    }
    for _ in 0..n_final {
        let edge = draft.add_edge();
        draft.attach_outgoing(edge, node)?;
    }
    draft.freeze()
}

/// Builds the requested topology families, dropping structural duplicates.
///
/// The n-body topology coincides with the isobar one for a two-body final state and is
/// emitted only once in that case.
pub fn build_topologies(
    n_initial: usize,
    n_final: usize,
    opts: &TopologyOpts,
) -> Result<Vec<Topology>, RxnError> {
    validate_request(n_initial, n_final)?;
    if !opts.isobar && !opts.nbody {
        return Err(invalid_request("no topology family selected", n_initial, n_final));
    }
    let mut topologies = Vec::new();
    if opts.isobar {
        topologies.extend(create_isobar_topologies(n_initial, n_final)?);
    }
    if opts.nbody {
        let nbody = create_nbody_topology(n_initial, n_final)?;
        let known: BTreeSet<String> = topologies.iter().map(structural_hash).collect();
        if !known.contains(&structural_hash(&nbody)) {
            topologies.push(nbody);
        }
    }
    Ok(topologies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_counts_follow_wedderburn_etherington() {
        let counts: Vec<usize> = (1..=8).map(|n| enumerate_shapes(n).len()).collect();
        assert_eq!(counts, vec![1, 1, 1, 2, 3, 6, 11, 23]);
    }
}
