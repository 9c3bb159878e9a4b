use std::collections::BTreeMap;

use rxn_core::{spin_projections, HalfInteger, Parity};
use serde::{Deserialize, Serialize};

use crate::numbers::{EdgeQn, EdgeQuantumNumbers, NodeQuantumNumbers, QnValue};

/// Admissible values per edge quantum number.
///
/// Quantum numbers without an entry are unconstrained, and undefined values (a photon's
/// isospin, a kaon's C parity) are never rejected by a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeQnDomains {
    domains: BTreeMap<EdgeQn, Vec<QnValue>>,
}

impl EdgeQnDomains {
    /// Creates an unconstrained set of domains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the domain of a quantum number; values are kept sorted and unique.
    pub fn with(mut self, qn: EdgeQn, values: impl IntoIterator<Item = QnValue>) -> Self {
        let mut values: Vec<QnValue> = values.into_iter().collect();
        values.sort();
        values.dedup();
        self.domains.insert(qn, values);
        self
    }

    /// Sets an integer domain `low..=high`.
    pub fn with_int_range(self, qn: EdgeQn, low: i64, high: i64) -> Self {
        self.with(qn, (low..=high).map(QnValue::Int))
    }

    /// Sets a half-integer domain `low..=high` in half steps.
    pub fn with_half_range(self, qn: EdgeQn, low: HalfInteger, high: HalfInteger) -> Self {
        self.with(qn, HalfInteger::half_range(low, high).into_iter().map(QnValue::Half))
    }

    /// Sets the domain `{-1, +1}`.
    pub fn with_parities(self, qn: EdgeQn) -> Self {
        self.with(qn, Parity::ALL.into_iter().map(QnValue::Parity))
    }

    /// Returns the domain of a quantum number, if constrained.
    pub fn get(&self, qn: EdgeQn) -> Option<&[QnValue]> {
        self.domains.get(&qn).map(Vec::as_slice)
    }

    /// Returns the first quantum number whose defined value lies outside its domain.
    pub fn first_violation(&self, qns: &EdgeQuantumNumbers) -> Option<EdgeQn> {
        self.domains.iter().find_map(|(qn, values)| match qns.get(*qn) {
            Some(value) if values.binary_search(&value).is_err() => Some(*qn),
            _ => None,
        })
    }

    /// Returns `true` when every defined value lies inside its domain.
    pub fn admits(&self, qns: &EdgeQuantumNumbers) -> bool {
        self.first_violation(qns).is_none()
    }
}

/// Candidate values for the quantum numbers of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeQnDomains {
    /// Orbital angular momentum magnitudes, ascending.
    #[serde(default)]
    pub l_magnitudes: Vec<HalfInteger>,
    /// Coupled spin magnitudes, ascending.
    #[serde(default)]
    pub s_magnitudes: Vec<HalfInteger>,
    /// Parity prefactors.
    #[serde(default)]
    pub parity_prefactors: Vec<Parity>,
    /// Enumerate the projections of L and S as well.
    #[serde(default)]
    pub with_projections: bool,
}

impl NodeQnDomains {
    /// Returns domains that leave every node quantum number unset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` when no node quantum number is enumerated.
    pub fn is_empty(&self) -> bool {
        self.l_magnitudes.is_empty() && self.s_magnitudes.is_empty() && self.parity_prefactors.is_empty()
    }

    /// Enumerates every node assignment in ascending order of L, then S, then prefactor.
    ///
    /// Always yields at least one assignment; unset quantum numbers stay `None`.
    pub fn enumerate(&self) -> Vec<NodeQuantumNumbers> {
        let spins = |magnitudes: &[HalfInteger]| -> Vec<(Option<HalfInteger>, Option<HalfInteger>)> {
            if magnitudes.is_empty() {
                return vec![(None, None)];
            }
            let mut out = Vec::new();
            for magnitude in magnitudes {
                if self.with_projections {
                    out.extend(
                        spin_projections(*magnitude)
                            .into_iter()
                            .map(|projection| (Some(*magnitude), Some(projection))),
                    );
                } else {
                    out.push((Some(*magnitude), None));
                }
            }
            out
        };
        let prefactors: Vec<Option<Parity>> = if self.parity_prefactors.is_empty() {
            vec![None]
        } else {
            self.parity_prefactors.iter().copied().map(Some).collect()
        };

        let mut assignments = Vec::new();
        for (l_magnitude, l_projection) in spins(&self.l_magnitudes) {
            for (s_magnitude, s_projection) in spins(&self.s_magnitudes) {
                for parity_prefactor in &prefactors {
                    assignments.push(NodeQuantumNumbers {
                        l_magnitude,
                        l_projection,
                        s_magnitude,
                        s_projection,
                        parity_prefactor: *parity_prefactor,
                    });
                }
            }
        }
        assignments
    }
}
