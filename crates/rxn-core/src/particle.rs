//! Static particle records and the lookup capability the solver consumes.

use std::collections::BTreeMap;
use std::iter::ExactSizeIterator;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RxnError};
use crate::halfint::HalfInteger;
use crate::quantum::{Parity, Spin};

/// Externally defined particle data. Never mutated once looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    /// Unique particle name, e.g. `pi0` or `f(0)(980)`.
    pub name: String,
    /// PDG identifier; antiparticles carry the negated value.
    pub pid: i64,
    /// Mass in GeV.
    pub mass: f64,
    /// Decay width in GeV, absent for stable particles.
    #[serde(default)]
    pub width: Option<f64>,
    /// Spin magnitude.
    pub spin: HalfInteger,
    /// Electric charge in units of the elementary charge.
    #[serde(default)]
    pub charge: i32,
    /// Isospin magnitude and projection for hadrons.
    #[serde(default)]
    pub isospin: Option<Spin>,
    /// Intrinsic parity.
    #[serde(default)]
    pub parity: Option<Parity>,
    /// C parity, defined for neutral self-conjugate states.
    #[serde(default)]
    pub c_parity: Option<Parity>,
    /// G parity, defined for non-strange mesons.
    #[serde(default)]
    pub g_parity: Option<Parity>,
    /// Strangeness.
    #[serde(default)]
    pub strangeness: i32,
    /// Charm.
    #[serde(default)]
    pub charmness: i32,
    /// Bottomness.
    #[serde(default)]
    pub bottomness: i32,
    /// Topness.
    #[serde(default)]
    pub topness: i32,
    /// Baryon number.
    #[serde(default)]
    pub baryon_number: i32,
    /// Electron lepton number.
    #[serde(default)]
    pub electron_lepton_number: i32,
    /// Muon lepton number.
    #[serde(default)]
    pub muon_lepton_number: i32,
    /// Tau lepton number.
    #[serde(default)]
    pub tau_lepton_number: i32,
}

impl ParticleRecord {
    /// Returns `true` for particles with any non-zero lepton number.
    pub fn is_lepton(&self) -> bool {
        self.electron_lepton_number != 0
            || self.muon_lepton_number != 0
            || self.tau_lepton_number != 0
    }

    /// Returns `true` for (anti)neutrinos.
    pub fn is_neutrino(&self) -> bool {
        matches!(self.pid.abs(), 12 | 14 | 16)
    }

    /// Returns `true` for the photon.
    pub fn is_photon(&self) -> bool {
        self.pid == 22
    }

    /// Returns `true` when the mass is exactly zero.
    pub fn is_massless(&self) -> bool {
        self.mass == 0.0
    }

    /// Returns `true` for half-integer spin.
    pub fn is_fermion(&self) -> bool {
        !self.spin.is_integer()
    }

    /// Returns the width, treating stable particles as zero width.
    pub fn width_or_zero(&self) -> f64 {
        self.width.unwrap_or(0.0)
    }
}

/// Read-only particle lookup keyed by name or PID.
///
/// Implementations must be safe to query from several worker threads at once.
pub trait ParticleLookup: Send + Sync {
    /// Finds a particle by its exact name.
    fn find(&self, name: &str) -> Result<Arc<ParticleRecord>, RxnError>;

    /// Finds a particle by its PDG identifier.
    fn find_pid(&self, pid: i64) -> Result<Arc<ParticleRecord>, RxnError>;

    /// Iterates over all known particles in a stable order.
    fn particles(&self) -> Box<dyn ExactSizeIterator<Item = Arc<ParticleRecord>> + '_>;
}

fn not_found(key: &str, value: impl ToString) -> RxnError {
    RxnError::ParticleNotFound(
        ErrorInfo::new("particle-not-found", "no particle matches the lookup key")
            .with_context(key, value.to_string()),
    )
}

/// In-memory [`ParticleLookup`] ordered by particle name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleCollection {
    by_name: BTreeMap<String, Arc<ParticleRecord>>,
    by_pid: BTreeMap<i64, String>,
}

impl ParticleCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection, rejecting duplicate names or PIDs.
    pub fn from_records<I>(records: I) -> Result<Self, RxnError>
    where
        I: IntoIterator<Item = ParticleRecord>,
    {
        let mut collection = Self::new();
        for record in records {
            collection.insert(record)?;
        }
        Ok(collection)
    }

    /// Adds a record.
    pub fn insert(&mut self, record: ParticleRecord) -> Result<(), RxnError> {
        if self.by_name.contains_key(&record.name) {
            return Err(RxnError::Config(
                ErrorInfo::new("duplicate-particle", "particle name already present")
                    .with_context("name", record.name.clone()),
            ));
        }
        if let Some(existing) = self.by_pid.get(&record.pid) {
            return Err(RxnError::Config(
                ErrorInfo::new("duplicate-pid", "PID already assigned to another particle")
                    .with_context("pid", record.pid.to_string())
                    .with_context("existing", existing.clone()),
            ));
        }
        self.by_pid.insert(record.pid, record.name.clone());
        self.by_name.insert(record.name.clone(), Arc::new(record));
        Ok(())
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Returns `true` when the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Returns the particle names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

impl ParticleLookup for ParticleCollection {
    fn find(&self, name: &str) -> Result<Arc<ParticleRecord>, RxnError> {
        self.by_name
            .get(name)
            .cloned()
            .ok_or_else(|| not_found("name", name))
    }

    fn find_pid(&self, pid: i64) -> Result<Arc<ParticleRecord>, RxnError> {
        self.by_pid
            .get(&pid)
            .and_then(|name| self.by_name.get(name))
            .cloned()
            .ok_or_else(|| not_found("pid", pid))
    }

    fn particles(&self) -> Box<dyn ExactSizeIterator<Item = Arc<ParticleRecord>> + '_> {
        Box::new(self.by_name.values().cloned())
    }
}
