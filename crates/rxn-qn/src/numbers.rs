use std::fmt::{self, Display};

use rxn_core::{HalfInteger, Parity, ParticleRecord, RxnError, Spin};
use serde::{Deserialize, Serialize};

/// Quantum numbers tracked on edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeQn {
    /// PDG identifier.
    Pid,
    /// Spin magnitude.
    SpinMagnitude,
    /// Spin projection (helicity or canonical projection depending on the formalism).
    SpinProjection,
    /// Electric charge.
    Charge,
    /// Isospin magnitude.
    IsospinMagnitude,
    /// Isospin projection.
    IsospinProjection,
    /// Strangeness.
    Strangeness,
    /// Charm.
    Charmness,
    /// Bottomness.
    Bottomness,
    /// Topness.
    Topness,
    /// Baryon number.
    BaryonNumber,
    /// Electron lepton number.
    ElectronLeptonNumber,
    /// Muon lepton number.
    MuonLeptonNumber,
    /// Tau lepton number.
    TauLeptonNumber,
    /// Intrinsic parity.
    Parity,
    /// C parity.
    CParity,
    /// G parity.
    GParity,
}

impl EdgeQn {
    /// Returns the snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeQn::Pid => "pid",
            EdgeQn::SpinMagnitude => "spin_magnitude",
            EdgeQn::SpinProjection => "spin_projection",
            EdgeQn::Charge => "charge",
            EdgeQn::IsospinMagnitude => "isospin_magnitude",
            EdgeQn::IsospinProjection => "isospin_projection",
            EdgeQn::Strangeness => "strangeness",
            EdgeQn::Charmness => "charmness",
            EdgeQn::Bottomness => "bottomness",
            EdgeQn::Topness => "topness",
            EdgeQn::BaryonNumber => "baryon_number",
            EdgeQn::ElectronLeptonNumber => "electron_lepton_number",
            EdgeQn::MuonLeptonNumber => "muon_lepton_number",
            EdgeQn::TauLeptonNumber => "tau_lepton_number",
            EdgeQn::Parity => "parity",
            EdgeQn::CParity => "c_parity",
            EdgeQn::GParity => "g_parity",
        }
    }
}

impl Display for EdgeQn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quantum numbers tracked on nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeQn {
    /// Orbital angular momentum magnitude.
    LMagnitude,
    /// Orbital angular momentum projection.
    LProjection,
    /// Coupled spin magnitude.
    SMagnitude,
    /// Coupled spin projection.
    SProjection,
    /// Parity prefactor relating helicity amplitudes.
    ParityPrefactor,
}

/// A single exact quantum-number value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QnValue {
    /// Parity-like eigenvalue.
    Parity(Parity),
    /// Integer valued quantity (charges, flavour numbers, PID).
    Int(i64),
    /// Half-integer valued quantity (spins, isospins).
    Half(HalfInteger),
}

impl Display for QnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QnValue::Parity(parity) => write!(f, "{parity}"),
            QnValue::Int(value) => write!(f, "{value}"),
            QnValue::Half(value) => write!(f, "{value}"),
        }
    }
}

/// Quantum numbers of an edge; `None` means undefined for the particle or not yet known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeQuantumNumbers {
    /// PDG identifier.
    pub pid: Option<i64>,
    /// Spin magnitude.
    pub spin_magnitude: Option<HalfInteger>,
    /// Spin projection.
    pub spin_projection: Option<HalfInteger>,
    /// Electric charge.
    pub charge: Option<i32>,
    /// Isospin magnitude.
    pub isospin_magnitude: Option<HalfInteger>,
    /// Isospin projection.
    pub isospin_projection: Option<HalfInteger>,
    /// Strangeness.
    pub strangeness: Option<i32>,
    /// Charm.
    pub charmness: Option<i32>,
    /// Bottomness.
    pub bottomness: Option<i32>,
    /// Topness.
    pub topness: Option<i32>,
    /// Baryon number.
    pub baryon_number: Option<i32>,
    /// Electron lepton number.
    pub electron_lepton_number: Option<i32>,
    /// Muon lepton number.
    pub muon_lepton_number: Option<i32>,
    /// Tau lepton number.
    pub tau_lepton_number: Option<i32>,
    /// Intrinsic parity.
    pub parity: Option<Parity>,
    /// C parity.
    pub c_parity: Option<Parity>,
    /// G parity.
    pub g_parity: Option<Parity>,
}

impl EdgeQuantumNumbers {
    /// Fully specifies the quantum numbers of a particle with the given spin projection.
    pub fn from_particle(record: &ParticleRecord, spin_projection: HalfInteger) -> Result<Self, RxnError> {
        let spin = Spin::new(record.spin, spin_projection)?;
        Ok(Self {
            pid: Some(record.pid),
            spin_magnitude: Some(spin.magnitude()),
            spin_projection: Some(spin.projection()),
            charge: Some(record.charge),
            isospin_magnitude: record.isospin.map(|isospin| isospin.magnitude()),
            isospin_projection: record.isospin.map(|isospin| isospin.projection()),
            strangeness: Some(record.strangeness),
            charmness: Some(record.charmness),
            bottomness: Some(record.bottomness),
            topness: Some(record.topness),
            baryon_number: Some(record.baryon_number),
            electron_lepton_number: Some(record.electron_lepton_number),
            muon_lepton_number: Some(record.muon_lepton_number),
            tau_lepton_number: Some(record.tau_lepton_number),
            parity: record.parity,
            c_parity: record.c_parity,
            g_parity: record.g_parity,
        })
    }

    /// Returns the value of a quantum number, if defined.
    pub fn get(&self, qn: EdgeQn) -> Option<QnValue> {
        let int = |value: Option<i32>| value.map(|v| QnValue::Int(i64::from(v)));
        match qn {
            EdgeQn::Pid => self.pid.map(QnValue::Int),
            EdgeQn::SpinMagnitude => self.spin_magnitude.map(QnValue::Half),
            EdgeQn::SpinProjection => self.spin_projection.map(QnValue::Half),
            EdgeQn::Charge => int(self.charge),
            EdgeQn::IsospinMagnitude => self.isospin_magnitude.map(QnValue::Half),
            EdgeQn::IsospinProjection => self.isospin_projection.map(QnValue::Half),
            EdgeQn::Strangeness => int(self.strangeness),
            EdgeQn::Charmness => int(self.charmness),
            EdgeQn::Bottomness => int(self.bottomness),
            EdgeQn::Topness => int(self.topness),
            EdgeQn::BaryonNumber => int(self.baryon_number),
            EdgeQn::ElectronLeptonNumber => int(self.electron_lepton_number),
            EdgeQn::MuonLeptonNumber => int(self.muon_lepton_number),
            EdgeQn::TauLeptonNumber => int(self.tau_lepton_number),
            EdgeQn::Parity => self.parity.map(QnValue::Parity),
            EdgeQn::CParity => self.c_parity.map(QnValue::Parity),
            EdgeQn::GParity => self.g_parity.map(QnValue::Parity),
        }
    }

    /// Returns the spin as a validated pair, if both parts are known.
    pub fn spin(&self) -> Option<Spin> {
        Spin::new(self.spin_magnitude?, self.spin_projection?).ok()
    }

    /// Returns the isospin as a validated pair, if both parts are known.
    pub fn isospin(&self) -> Option<Spin> {
        Spin::new(self.isospin_magnitude?, self.isospin_projection?).ok()
    }
}

/// Quantum numbers of a node (interaction vertex).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeQuantumNumbers {
    /// Orbital angular momentum magnitude.
    pub l_magnitude: Option<HalfInteger>,
    /// Orbital angular momentum projection.
    pub l_projection: Option<HalfInteger>,
    /// Coupled spin magnitude.
    pub s_magnitude: Option<HalfInteger>,
    /// Coupled spin projection.
    pub s_projection: Option<HalfInteger>,
    /// Parity prefactor.
    pub parity_prefactor: Option<Parity>,
}

impl NodeQuantumNumbers {
    /// Returns the value of a node quantum number, if set.
    pub fn get(&self, qn: NodeQn) -> Option<QnValue> {
        match qn {
            NodeQn::LMagnitude => self.l_magnitude.map(QnValue::Half),
            NodeQn::LProjection => self.l_projection.map(QnValue::Half),
            NodeQn::SMagnitude => self.s_magnitude.map(QnValue::Half),
            NodeQn::SProjection => self.s_projection.map(QnValue::Half),
            NodeQn::ParityPrefactor => self.parity_prefactor.map(QnValue::Parity),
        }
    }

    /// Returns a copy with the listed quantum numbers cleared.
    pub fn without(&self, ignored: &[NodeQn]) -> Self {
        let mut copy = *self;
        for qn in ignored {
            match qn {
                NodeQn::LMagnitude => copy.l_magnitude = None,
                NodeQn::LProjection => copy.l_projection = None,
                NodeQn::SMagnitude => copy.s_magnitude = None,
                NodeQn::SProjection => copy.s_projection = None,
                NodeQn::ParityPrefactor => copy.parity_prefactor = None,
            }
        }
        copy
    }

    /// Returns `L` with its projection, if both are set.
    pub fn l_spin(&self) -> Option<Spin> {
        Spin::new(self.l_magnitude?, self.l_projection?).ok()
    }

    /// Returns `S` with its projection, if both are set.
    pub fn s_spin(&self) -> Option<Spin> {
        Spin::new(self.s_magnitude?, self.s_projection?).ok()
    }
}
