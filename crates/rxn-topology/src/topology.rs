use std::collections::{BTreeSet, VecDeque};

use rxn_core::{EdgeId, ErrorInfo, NodeId, RxnError};
use serde::{Deserialize, Serialize};

/// Endpoints of a topology edge; `None` marks the system boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeEndpoints {
    /// Node producing the edge, absent for initial-state edges.
    pub originating_node: Option<NodeId>,
    /// Node consuming the edge, absent for final-state edges.
    pub ending_node: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct NodeRecord {
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

fn topology_error(code: &str, message: &str) -> RxnError {
    RxnError::Topology(ErrorInfo::new(code, message))
}

fn with_context(err: RxnError, key: &str, value: impl ToString) -> RxnError {
    match err {
        RxnError::Topology(info) => RxnError::Topology(info.with_context(key, value.to_string())),
        other => other,
    }
}

/// Immutable graph skeleton: nodes are interaction vertices and edges are particle lines.
///
/// Node and edge identifiers are dense arena indices starting at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeEndpoints>,
}

impl Topology {
    /// Returns all node identifiers in ascending order.
    pub fn node_ids(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|idx| NodeId::from_raw(idx as u32))
    }

    /// Returns all edge identifiers in ascending order.
    pub fn edge_ids(&self) -> impl ExactSizeIterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(|idx| EdgeId::from_raw(idx as u32))
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the endpoints of an edge.
    pub fn edge(&self, edge: EdgeId) -> Result<&EdgeEndpoints, RxnError> {
        self.edges.get(edge.index()).ok_or_else(|| {
            with_context(
                topology_error("unknown-edge", "edge not present in topology"),
                "edge",
                edge.as_raw(),
            )
        })
    }

    /// Returns the ordered incoming edges of a node, empty for unknown nodes.
    pub fn incoming_edges(&self, node: NodeId) -> &[EdgeId] {
        self.nodes
            .get(node.index())
            .map_or(&[][..], |record| record.incoming.as_slice())
    }

    /// Returns the ordered outgoing edges of a node, empty for unknown nodes.
    pub fn outgoing_edges(&self, node: NodeId) -> &[EdgeId] {
        self.nodes
            .get(node.index())
            .map_or(&[][..], |record| record.outgoing.as_slice())
    }

    /// Returns the edges entering the system (no originating node).
    pub fn initial_state_edges(&self) -> Vec<EdgeId> {
        self.edge_ids()
            .filter(|id| self.edges[id.index()].originating_node.is_none())
            .collect()
    }

    /// Returns the edges leaving the system (no ending node).
    pub fn final_state_edges(&self) -> Vec<EdgeId> {
        self.edge_ids()
            .filter(|id| self.edges[id.index()].ending_node.is_none())
            .collect()
    }

    /// Returns the edges connecting two nodes.
    pub fn intermediate_edges(&self) -> Vec<EdgeId> {
        self.edge_ids()
            .filter(|id| {
                let endpoints = &self.edges[id.index()];
                endpoints.originating_node.is_some() && endpoints.ending_node.is_some()
            })
            .collect()
    }

    /// Returns `true` for an external (initial or final state) edge.
    pub fn is_external(&self, edge: EdgeId) -> bool {
        self.edges.get(edge.index()).map_or(false, |endpoints| {
            endpoints.originating_node.is_none() || endpoints.ending_node.is_none()
        })
    }

    /// Returns the final-state edges reachable downstream of a node, sorted.
    pub fn originating_final_state_edges(&self, node: NodeId) -> Vec<EdgeId> {
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([node]);
        let mut seen = BTreeSet::new();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            for edge in self.outgoing_edges(current) {
                match self.edges[edge.index()].ending_node {
                    Some(next) => queue.push_back(next),
                    None => {
                        found.insert(*edge);
                    }
                }
            }
        }
        found.into_iter().collect()
    }

    /// Returns the initial-state edges reachable upstream of a node, sorted.
    pub fn originating_initial_state_edges(&self, node: NodeId) -> Vec<EdgeId> {
        let mut found = BTreeSet::new();
        let mut queue = VecDeque::from([node]);
        let mut seen = BTreeSet::new();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            for edge in self.incoming_edges(current) {
                match self.edges[edge.index()].originating_node {
                    Some(previous) => queue.push_back(previous),
                    None => {
                        found.insert(*edge);
                    }
                }
            }
        }
        found.into_iter().collect()
    }

    /// Returns `true` when any node is not a two-body split or merge.
    pub fn has_nbody_node(&self) -> bool {
        self.node_ids().any(|node| !self.is_two_body_node(node))
    }

    /// Returns `true` for `1 -> 2` and `2 -> 1` nodes.
    pub fn is_two_body_node(&self, node: NodeId) -> bool {
        matches!(
            (self.incoming_edges(node).len(), self.outgoing_edges(node).len()),
            (1, 2) | (2, 1)
        )
    }
}

/// Mutable builder that validates the structural invariants when frozen.
#[derive(Debug, Clone, Default)]
pub struct TopologyDraft {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeEndpoints>,
}

impl TopologyDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unconnected node.
    pub fn add_node(&mut self) -> NodeId {
        self.nodes.push(NodeRecord::default());
        NodeId::from_raw((self.nodes.len() - 1) as u32)
    }

    /// Adds an unconnected edge.
    pub fn add_edge(&mut self) -> EdgeId {
        self.edges.push(EdgeEndpoints {
            originating_node: None,
            ending_node: None,
        });
        EdgeId::from_raw((self.edges.len() - 1) as u32)
    }

    /// Makes `edge` an incoming edge of `node`.
    pub fn attach_incoming(&mut self, edge: EdgeId, node: NodeId) -> Result<(), RxnError> {
        self.check_node(node)?;
        let endpoints = self.edge_mut(edge)?;
        if endpoints.ending_node.is_some() {
            return Err(with_context(
                topology_error("edge-already-attached", "edge already has an ending node"),
                "edge",
                edge.as_raw(),
            ));
        }
        if endpoints.originating_node == Some(node) {
            return Err(with_context(
                topology_error("self-loop", "edge would start and end at the same node"),
                "node",
                node.as_raw(),
            ));
        }
        endpoints.ending_node = Some(node);
        self.nodes[node.index()].incoming.push(edge);
        Ok(())
    }

    /// Makes `edge` an outgoing edge of `node`.
    pub fn attach_outgoing(&mut self, edge: EdgeId, node: NodeId) -> Result<(), RxnError> {
        self.check_node(node)?;
        let endpoints = self.edge_mut(edge)?;
        if endpoints.originating_node.is_some() {
            return Err(with_context(
                topology_error("edge-already-attached", "edge already has an originating node"),
                "edge",
                edge.as_raw(),
            ));
        }
        if endpoints.ending_node == Some(node) {
            return Err(with_context(
                topology_error("self-loop", "edge would start and end at the same node"),
                "node",
                node.as_raw(),
            ));
        }
        endpoints.originating_node = Some(node);
        self.nodes[node.index()].outgoing.push(edge);
        Ok(())
    }

    /// Validates degrees, dangling edges and acyclicity, then freezes the draft.
    pub fn freeze(self) -> Result<Topology, RxnError> {
        if self.nodes.is_empty() {
            return Err(topology_error("empty-topology", "topology has no nodes"));
        }
        for (idx, record) in self.nodes.iter().enumerate() {
            if record.incoming.is_empty() || record.outgoing.is_empty() {
                return Err(RxnError::Topology(
                    ErrorInfo::new("node-degree", "node needs at least one incoming and one outgoing edge")
                        .with_context("node", idx.to_string())
                        .with_context("in", record.incoming.len().to_string())
                        .with_context("out", record.outgoing.len().to_string()),
                ));
            }
        }
        for (idx, endpoints) in self.edges.iter().enumerate() {
            if endpoints.originating_node.is_none() && endpoints.ending_node.is_none() {
                return Err(with_context(
                    topology_error("dangling-edge", "edge is not attached to any node"),
                    "edge",
                    idx,
                ));
            }
        }
        let topology = Topology {
            nodes: self.nodes,
            edges: self.edges,
        };
        ensure_acyclic(&topology)?;
        Ok(topology)
    }

    fn check_node(&self, node: NodeId) -> Result<(), RxnError> {
        if node.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(with_context(
                topology_error("unknown-node", "node not present in draft"),
                "node",
                node.as_raw(),
            ))
        }
    }

    fn edge_mut(&mut self, edge: EdgeId) -> Result<&mut EdgeEndpoints, RxnError> {
        self.edges.get_mut(edge.index()).ok_or_else(|| {
            with_context(
                topology_error("unknown-edge", "edge not present in draft"),
                "edge",
                edge.as_raw(),
            )
        })
    }
}

fn ensure_acyclic(topology: &Topology) -> Result<(), RxnError> {
    let mut pending: Vec<usize> = topology
        .nodes
        .iter()
        .map(|record| {
            record
                .incoming
                .iter()
                .filter(|edge| topology.edges[edge.index()].originating_node.is_some())
                .count()
        })
        .collect();
    let mut ready: VecDeque<NodeId> = topology
        .node_ids()
        .filter(|node| pending[node.index()] == 0)
        .collect();
    let mut visited = 0usize;
    while let Some(node) = ready.pop_front() {
        visited += 1;
        for edge in topology.outgoing_edges(node) {
            if let Some(next) = topology.edges[edge.index()].ending_node {
                pending[next.index()] -= 1;
                if pending[next.index()] == 0 {
                    ready.push_back(next);
                }
            }
        }
    }
    if visited == topology.node_count() {
        Ok(())
    } else {
        Err(topology_error("cycle", "topology contains a directed cycle"))
    }
}
