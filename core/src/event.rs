//! Events emitted by runners and concept advance steps.
//!
//! Runners append these to their event log; callers drain the log with
//! `SimulationRunner::take_events`.

use crate::{
    concept::ConceptId,
    params::ParamValue,
    qubit::Gate,
    scene::Spin,
    types::FrameCount,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunnerEvent {
    // ── Lifecycle ──────────────────────────────────
    Started {
        concept: ConceptId,
        frame:   FrameCount,
    },
    Paused {
        concept: ConceptId,
        frame:   FrameCount,
    },
    Reset {
        concept: ConceptId,
    },
    ParameterChanged {
        name:  String,
        value: ParamValue,
    },
    SimulationCompleted {
        concept: ConceptId,
        frame:   FrameCount,
    },

    // ── Scene ──────────────────────────────────────
    ParticleEmitted {
        frame: FrameCount,
    },
    ParticleTunneled {
        frame: FrameCount,
    },
    ParticleReflected {
        frame: FrameCount,
    },
    SpinsMeasured {
        frame:      FrameCount,
        a:          Spin,
        b:          Spin,
        correlated: bool,
    },
    CatObserved {
        frame: FrameCount,
        alive: bool,
    },
    BoxClosed {
        frame: FrameCount,
    },
    StateMeasured {
        frame: FrameCount,
        spin:  Spin,
    },
    GateApplied {
        frame: FrameCount,
        gate:  Gate,
        qubit: usize,
    },
    QubitMeasured {
        frame: FrameCount,
        qubit: usize,
        one:   bool,
    },
}

impl RunnerEvent {
    /// True for events that collapse a superposition.
    pub fn is_observation(&self) -> bool {
        matches!(
            self,
            Self::CatObserved { .. }
                | Self::SpinsMeasured { .. }
                | Self::StateMeasured { .. }
                | Self::QubitMeasured { .. }
        )
    }
}

/// Stable string name for a RunnerEvent variant.
pub fn event_type_name(event: &RunnerEvent) -> &'static str {
    match event {
        RunnerEvent::Started { .. }             => "started",
        RunnerEvent::Paused { .. }              => "paused",
        RunnerEvent::Reset { .. }               => "reset",
        RunnerEvent::ParameterChanged { .. }    => "parameter_changed",
        RunnerEvent::SimulationCompleted { .. } => "simulation_completed",
        RunnerEvent::ParticleEmitted { .. }     => "particle_emitted",
        RunnerEvent::ParticleTunneled { .. }    => "particle_tunneled",
        RunnerEvent::ParticleReflected { .. }   => "particle_reflected",
        RunnerEvent::SpinsMeasured { .. }       => "spins_measured",
        RunnerEvent::CatObserved { .. }         => "cat_observed",
        RunnerEvent::BoxClosed { .. }           => "box_closed",
        RunnerEvent::StateMeasured { .. }       => "state_measured",
        RunnerEvent::GateApplied { .. }         => "gate_applied",
        RunnerEvent::QubitMeasured { .. }       => "qubit_measured",
    }
}
