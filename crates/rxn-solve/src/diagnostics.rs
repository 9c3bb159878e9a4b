//! Explanations for topologies and problem sets that produced no solutions.

use std::collections::BTreeMap;

use rxn_core::NodeId;
use serde::{Deserialize, Serialize};

/// What eliminated the candidates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum DiagnosticSource {
    /// A conservation rule, by name.
    Rule(String),
    /// No candidate particle survived the intermediate-particle filter and edge domains.
    CandidateFilter,
    /// No allowed interaction type is compatible with the node.
    InteractionTypes,
    /// The search was cancelled or ran out of time.
    Timeout,
}

/// One entry of the diagnostics list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Topology the entry refers to.
    pub topology_index: usize,
    /// Node the rejection happened at, if node specific.
    pub node: Option<NodeId>,
    /// Eliminating source.
    pub source: DiagnosticSource,
    /// Human readable reason of the first rejection.
    pub reason: String,
    /// Number of rejected branches.
    pub count: u64,
}

impl Diagnostic {
    /// Returns the rule name for rule diagnostics.
    pub fn rule_name(&self) -> Option<&str> {
        match &self.source {
            DiagnosticSource::Rule(name) => Some(name),
            _ => None,
        }
    }
}

/// Sums entries with the same topology, node and source; keeps the first reason.
pub fn merge_diagnostics(entries: impl IntoIterator<Item = Diagnostic>) -> Vec<Diagnostic> {
    let mut merged: BTreeMap<(usize, Option<NodeId>, DiagnosticSource), Diagnostic> = BTreeMap::new();
    for entry in entries {
        let key = (entry.topology_index, entry.node, entry.source.clone());
        merged
            .entry(key)
            .and_modify(|known| known.count += entry.count)
            .or_insert(entry);
    }
    merged.into_values().collect()
}
