use std::fmt::{self, Display};

use rxn_qn::{EdgeQn, EdgeQuantumNumbers, EdgeState, NodeProperties, QnValue};
use serde::{Deserialize, Serialize};

/// Side of a node an edge is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Edge entering the node.
    Incoming,
    /// Edge leaving the node.
    Outgoing,
}

impl Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Incoming => f.write_str("incoming"),
            Side::Outgoing => f.write_str("outgoing"),
        }
    }
}

/// The data a rule sees: the node's adjacent edges in topology order and its properties.
///
/// `None` slots are edges the search has not resolved yet.
#[derive(Debug, Clone, Copy)]
pub struct NodeView<'a> {
    /// Incoming edge states.
    pub incoming: &'a [Option<&'a EdgeState>],
    /// Outgoing edge states.
    pub outgoing: &'a [Option<&'a EdgeState>],
    /// Node properties, `None` while they are still being chosen.
    pub node: Option<&'a NodeProperties>,
}

impl<'a> NodeView<'a> {
    /// Returns every slot with its side and position.
    pub fn slots(&self) -> impl Iterator<Item = (Side, usize, Option<&'a EdgeState>)> + 'a {
        let (incoming, outgoing): (&'a [Option<&'a EdgeState>], &'a [Option<&'a EdgeState>]) =
            (self.incoming, self.outgoing);
        let incoming = incoming
            .iter()
            .enumerate()
            .map(|(pos, slot)| (Side::Incoming, pos, *slot));
        let outgoing = outgoing
            .iter()
            .enumerate()
            .map(|(pos, slot)| (Side::Outgoing, pos, *slot));
        incoming.chain(outgoing)
    }

    /// Returns the resolved states of both sides, or `None` if any slot is still open.
    pub fn resolved(&self) -> Option<(Vec<&'a EdgeState>, Vec<&'a EdgeState>)> {
        let incoming = self.incoming.iter().copied().collect::<Option<Vec<_>>>()?;
        let outgoing = self.outgoing.iter().copied().collect::<Option<Vec<_>>>()?;
        Some((incoming, outgoing))
    }

    /// Returns `(incoming, outgoing)` edge counts.
    pub fn arity(&self) -> (usize, usize) {
        (self.incoming.len(), self.outgoing.len())
    }
}

/// Why a rule rejected its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The inputs contradict the conservation law.
    Violated,
    /// A required input was undefined; treated as failure.
    MissingInput,
}

/// A rule rejection with a human readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rejection class.
    pub kind: ViolationKind,
    /// Explanation for diagnostics.
    pub reason: String,
}

impl Violation {
    /// Creates a violation of the conservation law itself.
    pub fn violated(reason: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::Violated,
            reason: reason.into(),
        }
    }

    /// Creates a rejection caused by missing input.
    pub fn missing(reason: impl Into<String>) -> Self {
        Self {
            kind: ViolationKind::MissingInput,
            reason: reason.into(),
        }
    }
}

/// Narrowed domain for one unresolved edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    /// Side of the unresolved edge.
    pub side: Side,
    /// Position of the unresolved edge on its side.
    pub position: usize,
    /// Quantum number being restricted.
    pub qn: EdgeQn,
    /// Values the quantum number may still take.
    pub allowed: Vec<QnValue>,
}

impl Restriction {
    /// Returns `true` when a candidate's value is among the allowed ones.
    pub fn admits(&self, qns: &EdgeQuantumNumbers) -> bool {
        qns.get(self.qn)
            .map_or(false, |value| self.allowed.contains(&value))
    }
}

/// Outcome of evaluating a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The inputs satisfy the rule.
    Pass,
    /// The inputs violate the rule or lack required data.
    Fail(Violation),
    /// Not decidable until more edges are resolved.
    Deferred,
    /// Not decidable yet, but the single open edge must satisfy the restriction.
    Restrict(Restriction),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Fail`].
    pub fn is_fail(&self) -> bool {
        matches!(self, Verdict::Fail(_))
    }
}

impl From<Result<(), Violation>> for Verdict {
    fn from(result: Result<(), Violation>) -> Self {
        match result {
            Ok(()) => Verdict::Pass,
            Err(violation) => Verdict::Fail(violation),
        }
    }
}

/// Extracts a required value or reports it as missing.
pub(crate) fn require<T>(value: Option<T>, what: &str, side: Side, position: usize) -> Result<T, Violation> {
    value.ok_or_else(|| Violation::missing(format!("{side} edge {position} has no {what}")))
}

/// Extracts a required node value or reports it as missing.
pub(crate) fn require_node<T>(value: Option<T>, what: &str) -> Result<T, Violation> {
    value.ok_or_else(|| Violation::missing(format!("node has no {what}")))
}
