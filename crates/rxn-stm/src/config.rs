//! YAML-loadable manager configuration and reaction requests.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use rxn_core::{ErrorInfo, HalfInteger, InteractionType, RxnError};
use rxn_solve::FormalismType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

fn io_error(path: &Path, err: impl ToString) -> RxnError {
    RxnError::Runtime(ErrorInfo::new("config-read", err.to_string()).with_context("path", path.display().to_string()))
}

fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, RxnError> {
    serde_yaml::from_slice(data).map_err(|err| RxnError::Serde(ErrorInfo::new("config-parse", err.to_string())))
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, RxnError> {
    let bytes = fs::read(path).map_err(|err| io_error(path, err))?;
    from_yaml_slice(&bytes)
}

/// How far down the strength ranking the manager keeps searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolvingMode {
    /// Stop after the strongest group of problem sets that produced solutions; the
    /// weaker groups are counted as skipped.
    Fast,
    /// Solve every problem set.
    #[default]
    Full,
}

/// Manager settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManagerConfig {
    /// Formalism the solutions are built for.
    #[serde(default)]
    pub formalism: FormalismType,
    /// Full (default) or fast search over strength groups.
    #[serde(default)]
    pub solving_mode: SolvingMode,
    /// Also build the single n-body node topology.
    #[serde(default)]
    pub include_nbody_topology: bool,
    /// Multiplier of the widths in the mass threshold rule.
    #[serde(default)]
    pub mass_width_factor: f64,
    /// Worker threads; the rayon default when unset.
    #[serde(default)]
    pub threads: Option<usize>,
    /// Search time limit per topology, in milliseconds.
    #[serde(default)]
    pub topology_timeout_ms: Option<u64>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            formalism: FormalismType::default(),
            solving_mode: SolvingMode::default(),
            include_nbody_topology: false,
            mass_width_factor: 0.0,
            threads: None,
            topology_timeout_ms: None,
        }
    }
}

impl ManagerConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RxnError> {
        let config: Self = from_yaml_slice(yaml.as_bytes())?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the solver cannot work with.
    pub fn validate(&self) -> Result<(), RxnError> {
        if !self.mass_width_factor.is_finite() || self.mass_width_factor < 0.0 {
            return Err(RxnError::Config(
                ErrorInfo::new("invalid-config", "mass width factor must be finite and non-negative")
                    .with_context("mass_width_factor", self.mass_width_factor.to_string()),
            ));
        }
        if self.threads == Some(0) {
            return Err(RxnError::Config(
                ErrorInfo::new("invalid-config", "thread count must be positive")
                    .with_hint("leave threads unset to use the default pool size"),
            ));
        }
        Ok(())
    }

    /// Per-topology timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.topology_timeout_ms.map(Duration::from_millis)
    }
}

/// Loads a [`ManagerConfig`] from a YAML file.
pub fn load_config(path: &Path) -> Result<ManagerConfig, RxnError> {
    let config: ManagerConfig = read_yaml(path)?;
    config.validate()?;
    Ok(config)
}

/// An external state: a particle name, optionally with the spin projections to consider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateSpec {
    /// Every spin projection of the particle.
    Name(String),
    /// Only the listed spin projections.
    WithProjections {
        /// Particle name.
        name: String,
        /// Allowed spin projections.
        spin_projections: Vec<HalfInteger>,
    },
}

impl StateSpec {
    /// Restricts a particle to the given projections.
    pub fn with_projections(name: impl Into<String>, spin_projections: &[HalfInteger]) -> Self {
        StateSpec::WithProjections {
            name: name.into(),
            spin_projections: spin_projections.to_vec(),
        }
    }

    /// Particle name.
    pub fn name(&self) -> &str {
        match self {
            StateSpec::Name(name) | StateSpec::WithProjections { name, .. } => name,
        }
    }

    /// Explicit projections, if any.
    pub fn spin_projections(&self) -> Option<&[HalfInteger]> {
        match self {
            StateSpec::Name(_) => None,
            StateSpec::WithProjections { spin_projections, .. } => Some(spin_projections),
        }
    }
}

impl From<&str> for StateSpec {
    fn from(name: &str) -> Self {
        StateSpec::Name(name.to_string())
    }
}

impl From<String> for StateSpec {
    fn from(name: String) -> Self {
        StateSpec::Name(name)
    }
}

/// A reaction to solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactionRequest {
    /// Initial-state particles.
    pub initial_state: Vec<StateSpec>,
    /// Final-state particles.
    pub final_state: Vec<StateSpec>,
    /// Interaction type names (`strong`, `em`, `weak` or `all`); every type when unset.
    #[serde(default)]
    pub allowed_interaction_types: Option<Vec<String>>,
    /// Case-insensitive substrings intermediate particle names must contain; every
    /// particle when unset.
    #[serde(default)]
    pub allowed_intermediate_particles: Option<Vec<String>>,
    /// Alternative groupings; each lists groups of final-state names that must
    /// originate from a common node.
    #[serde(default)]
    pub final_state_groupings: Vec<Vec<Vec<String>>>,
}

impl ReactionRequest {
    /// Creates a request with every interaction type and intermediate particle allowed.
    pub fn new<I, F>(initial_state: I, final_state: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<StateSpec>,
        F: IntoIterator,
        F::Item: Into<StateSpec>,
    {
        Self {
            initial_state: initial_state.into_iter().map(Into::into).collect(),
            final_state: final_state.into_iter().map(Into::into).collect(),
            allowed_interaction_types: None,
            allowed_intermediate_particles: None,
            final_state_groupings: Vec::new(),
        }
    }

    /// Restricts the interaction types.
    pub fn with_interaction_types(mut self, names: &[&str]) -> Self {
        self.allowed_interaction_types = Some(names.iter().map(|name| name.to_string()).collect());
        self
    }

    /// Restricts the intermediate particles by name substring.
    pub fn with_intermediate_particles(mut self, patterns: &[&str]) -> Self {
        self.allowed_intermediate_particles = Some(patterns.iter().map(|name| name.to_string()).collect());
        self
    }

    /// Adds an allowed grouping of final-state particles.
    pub fn with_final_state_grouping(mut self, groups: &[&[&str]]) -> Self {
        self.final_state_groupings.push(
            groups
                .iter()
                .map(|group| group.iter().map(|name| name.to_string()).collect())
                .collect(),
        );
        self
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, RxnError> {
        from_yaml_slice(yaml.as_bytes())
    }

    /// Resolved interaction type selection.
    pub fn interaction_selection(&self) -> Result<BTreeSet<InteractionType>, RxnError> {
        let selection = match &self.allowed_interaction_types {
            None => InteractionType::ALL.into_iter().collect(),
            Some(names) => InteractionType::parse_selection(names)?,
        };
        if selection.is_empty() {
            return Err(RxnError::Config(
                ErrorInfo::new("no-interaction-types", "no interaction type is allowed")
                    .with_hint("list at least one of strong, em, weak or use all"),
            ));
        }
        Ok(selection)
    }
}

/// Loads a [`ReactionRequest`] from a YAML file.
pub fn load_request(path: &Path) -> Result<ReactionRequest, RxnError> {
    read_yaml(path)
}
