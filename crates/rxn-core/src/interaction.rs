//! Interaction strength classes.

use std::collections::BTreeSet;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RxnError};

/// Strength class of the interaction at a node.
///
/// Variants are ordered from strongest to weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    /// Strong interaction.
    Strong,
    /// Electromagnetic interaction.
    #[serde(alias = "EM", alias = "electromagnetic")]
    Em,
    /// Weak interaction.
    Weak,
}

impl InteractionType {
    /// All interaction types, strongest first.
    pub const ALL: [InteractionType; 3] =
        [InteractionType::Strong, InteractionType::Em, InteractionType::Weak];

    /// Returns the relative strength used to rank solutions.
    pub fn strength(self) -> f64 {
        match self {
            InteractionType::Strong => 60.0,
            InteractionType::Em => 1.0,
            InteractionType::Weak => 1e-4,
        }
    }

    /// Returns the lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::Strong => "strong",
            InteractionType::Em => "em",
            InteractionType::Weak => "weak",
        }
    }

    /// Parses a list of names into a set; the alias `all` selects every type.
    pub fn parse_selection<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<InteractionType>, RxnError> {
        let mut selection = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().eq_ignore_ascii_case("all") {
                selection.extend(InteractionType::ALL);
            } else {
                selection.insert(name.parse()?);
            }
        }
        Ok(selection)
    }
}

impl FromStr for InteractionType {
    type Err = RxnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strong" => Ok(InteractionType::Strong),
            "em" | "electromagnetic" => Ok(InteractionType::Em),
            "weak" => Ok(InteractionType::Weak),
            _ => Err(RxnError::Config(
                ErrorInfo::new("unknown-interaction-type", "unrecognized interaction type")
                    .with_context("token", s)
                    .with_hint("use strong, em, weak or all"),
            )),
        }
    }
}

impl Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
