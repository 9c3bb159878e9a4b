//! Amplitude formalisms and the node quantum numbers they care about.

use std::fmt::{self, Display};
use std::str::FromStr;

use rxn_core::{ErrorInfo, RxnError};
use rxn_qn::NodeQn;
use serde::{Deserialize, Serialize};

/// Amplitude formalism the solutions are built for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormalismType {
    /// Helicity formalism; L and S only enter through selection rules.
    #[default]
    Helicity,
    /// Helicity amplitudes expanded in the canonical basis.
    CanonicalHelicity,
    /// Canonical formalism with L and S projections.
    Canonical,
}

const LS_QNS: [NodeQn; 4] = [
    NodeQn::LMagnitude,
    NodeQn::LProjection,
    NodeQn::SMagnitude,
    NodeQn::SProjection,
];

impl FormalismType {
    /// Returns the node quantum numbers that do not distinguish two solutions.
    pub fn ignored_node_qns(self) -> &'static [NodeQn] {
        match self {
            FormalismType::Helicity => &LS_QNS,
            FormalismType::CanonicalHelicity | FormalismType::Canonical => &[],
        }
    }

    /// Returns `true` for formalisms built on helicity amplitudes.
    pub fn is_helicity_based(self) -> bool {
        matches!(self, FormalismType::Helicity | FormalismType::CanonicalHelicity)
    }

    /// Returns the configuration spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            FormalismType::Helicity => "helicity",
            FormalismType::CanonicalHelicity => "canonical-helicity",
            FormalismType::Canonical => "canonical",
        }
    }
}

impl Display for FormalismType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormalismType {
    type Err = RxnError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "helicity" => Ok(FormalismType::Helicity),
            "canonical-helicity" | "canonical_helicity" => Ok(FormalismType::CanonicalHelicity),
            "canonical" => Ok(FormalismType::Canonical),
            _ => Err(RxnError::Config(
                ErrorInfo::new("unknown-formalism", "formalism is not recognised")
                    .with_context("formalism", value)
                    .with_hint("use helicity, canonical-helicity or canonical"),
            )),
        }
    }
}
