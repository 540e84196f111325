//! Per-run derived state.
//!
//! Anything a concept needs to remember between frames lives here and
//! nowhere else. The runner owns one SceneState per mounted concept,
//! hands it mutably to the concept's `advance` step and immutably to
//! `render`. Reset empties it.

use crate::{
    qubit::{Gate, Qubit},
    rng::SceneRng,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Incident,
    Tunneled,
    Reflected,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    pub x:    f64,
    pub y:    f64,
    pub vx:   f64,
    pub kind: ParticleKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SceneCounters {
    pub emitted:      u64,
    pub tunneled:     u64,
    pub reflected:    u64,
    pub detected:     u64,
    pub measurements: u64,
    pub correlations: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    pub fn flipped(self) -> Self {
        match self {
            Self::Up   => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatState {
    #[default]
    Superposition,
    Alive,
    Dead,
}

/// One entry in the qubit circuit log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CircuitStep {
    Gate { gate: Gate, qubit: usize },
    Measure { qubit: usize, one: bool },
}

impl CircuitStep {
    pub fn describe(&self) -> String {
        match self {
            Self::Gate { gate, qubit }   => format!("{gate} on Q{qubit}"),
            Self::Measure { qubit, one } => format!("Measure Q{qubit} → |{}⟩", u8::from(*one)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneState {
    pub particles:   Vec<Particle>,
    /// Screen hits binned along the detector, used by interference concepts.
    pub histogram:   Vec<u32>,
    pub counters:    SceneCounters,
    /// Last measured spin pair (A, B).
    pub spins:       Option<(Spin, Spin)>,
    pub cat:         CatState,
    /// Accumulated decay, in percentage points.
    pub decay_level: f64,
    /// Outcome of a single-spin measurement, once made.
    pub measured:    Option<Spin>,
    /// Sampled electron positions relative to the nucleus.
    pub cloud:       Vec<(f64, f64)>,
    pub qubits:      Vec<Qubit>,
    pub circuit:     Vec<CircuitStep>,
    rng:             SceneRng,
}

impl SceneState {
    pub fn new(rng: SceneRng) -> Self {
        Self {
            particles:   Vec::new(),
            histogram:   Vec::new(),
            counters:    SceneCounters::default(),
            spins:       None,
            cat:         CatState::Superposition,
            decay_level: 0.0,
            measured:    None,
            cloud:       Vec::new(),
            qubits:      Vec::new(),
            circuit:     Vec::new(),
            rng,
        }
    }

    /// Empty every per-run field and rewind the RNG.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.histogram.clear();
        self.counters = SceneCounters::default();
        self.spins = None;
        self.cat = CatState::Superposition;
        self.decay_level = 0.0;
        self.measured = None;
        self.cloud.clear();
        self.qubits.clear();
        self.circuit.clear();
        self.rng.restart();
    }

    pub fn rng(&mut self) -> &mut SceneRng {
        &mut self.rng
    }

    /// Add one hit to `bin`, growing the histogram to `bins` if needed.
    pub fn record_hit(&mut self, bin: usize, bins: usize) {
        if self.histogram.len() < bins {
            self.histogram.resize(bins, 0);
        }
        if let Some(slot) = self.histogram.get_mut(bin) {
            *slot += 1;
            self.counters.detected += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
            && self.histogram.iter().all(|&h| h == 0)
            && self.counters == SceneCounters::default()
            && self.spins.is_none()
            && self.cat == CatState::Superposition
            && self.decay_level == 0.0
            && self.measured.is_none()
            && self.cloud.is_empty()
            && self.qubits.iter().all(|q| *q == Qubit::zero())
            && self.circuit.is_empty()
    }
}
