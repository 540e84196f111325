//! Concept trait, the strategy a runner drives.
//!
//! RULE: Every visualization implements Concept.
//! `render` is a pure function of (time, params, scene): it takes the
//! scene by shared reference and must not hold state of its own, so a
//! paused runner redraws identically. Anything that evolves across frames
//! goes through `advance`. Scene state mutates only there and in the two
//! input hooks, `on_parameter` and `trigger`.

use crate::{
    error::{VizError, VizResult},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    render::{Frame, SurfaceSize},
    scene::SceneState,
    scheduler::Cadence,
    types::{FrameCount, LogicalTime},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

/// Stable concept identifiers.
/// NEVER reorder or remove entries. The discriminant seeds the scene RNG.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
#[repr(u64)]
pub enum ConceptId {
    WaveParticle   = 0,
    Tunneling      = 1,
    DoubleSlit     = 2,
    SchrodingerCat = 3,
    Entanglement   = 4,
    Uncertainty    = 5,
    Superposition  = 6,
    WaveEquation   = 7,
    Orbitals       = 8,
    QubitCircuit   = 9,
    // Add new concepts here. Append only.
}

impl ConceptId {
    pub const ALL: [ConceptId; 10] = [
        Self::WaveParticle,
        Self::Tunneling,
        Self::DoubleSlit,
        Self::SchrodingerCat,
        Self::Entanglement,
        Self::Uncertainty,
        Self::Superposition,
        Self::WaveEquation,
        Self::Orbitals,
        Self::QubitCircuit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaveParticle   => "wave-particle",
            Self::Tunneling      => "tunneling",
            Self::DoubleSlit     => "double-slit",
            Self::SchrodingerCat => "schrodinger-cat",
            Self::Entanglement   => "entanglement",
            Self::Uncertainty    => "uncertainty",
            Self::Superposition  => "superposition",
            Self::WaveEquation   => "schrodinger-equation",
            Self::Orbitals       => "orbitals",
            Self::QubitCircuit   => "quantum-computing",
        }
    }

    pub fn slot(&self) -> u64 {
        *self as u64
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConceptId {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| VizError::UnknownConcept { id: s.to_string() })
    }
}

/// When a concept marks itself completed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionRule {
    /// After running for this long. Converted to a frame count at the
    /// concept's cadence when the runner is mounted.
    AfterRunning(Duration),
    /// On the first frame whose advance step produced an observation.
    OnObservation,
}

/// A one-shot button a concept exposes next to its controls.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionSpec {
    pub name:  &'static str,
    pub label: &'static str,
}

impl ActionSpec {
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self { name, label }
    }
}

/// Immediate effect of a parameter change or a triggered action.
/// Applied by the runner whether or not it is running.
#[derive(Debug, Default, PartialEq)]
pub struct Reaction {
    pub events: Vec<RunnerEvent>,
    /// Stop the run after applying.
    pub halt:   bool,
}

impl Reaction {
    pub fn none() -> Self { Self::default() }

    pub fn halt() -> Self {
        Self { events: Vec::new(), halt: true }
    }

    pub fn with_event(mut self, event: RunnerEvent) -> Self {
        self.events.push(event);
        self
    }
}

/// The contract every concept must fulfill.
pub trait Concept {
    fn id(&self) -> ConceptId;
    fn title(&self) -> &'static str;
    fn description(&self) -> &'static str;

    /// Input widgets, in display order. Defaults seed the ParameterSet.
    fn controls(&self) -> Vec<ControlSpec>;

    fn cadence(&self) -> Cadence {
        Cadence::DisplayRefresh
    }

    fn completion(&self) -> Option<CompletionRule> {
        None
    }

    /// Explicit per-frame update of derived state. Called once per
    /// running frame, before `render`.
    fn advance(
        &self,
        _frame: FrameCount,
        _time: LogicalTime,
        _params: &ParameterSet,
        _scene: &mut SceneState,
    ) -> Vec<RunnerEvent> {
        Vec::new()
    }

    /// Called after `name` has been validated and stored.
    fn on_parameter(
        &self,
        _name: &str,
        _frame: FrameCount,
        _params: &ParameterSet,
        _scene: &mut SceneState,
    ) -> Reaction {
        Reaction::none()
    }

    fn actions(&self) -> Vec<ActionSpec> {
        Vec::new()
    }

    /// Run a named action. The runner only calls this with names listed
    /// by `actions`.
    fn trigger(
        &self,
        action: &str,
        _frame: FrameCount,
        _params: &ParameterSet,
        _scene: &mut SceneState,
    ) -> VizResult<Reaction> {
        Err(VizError::UnknownAction { name: action.into() })
    }

    fn render(
        &self,
        time: LogicalTime,
        params: &ParameterSet,
        scene: &SceneState,
        size: SurfaceSize,
    ) -> Frame;
}

/// Serializable description of a concept, for UI menus.
#[derive(Debug, Clone, Serialize)]
pub struct ConceptInfo {
    pub id:          ConceptId,
    pub title:       &'static str,
    pub description: &'static str,
    pub cadence:     Cadence,
    pub controls:    Vec<ControlSpec>,
    pub actions:     Vec<ActionSpec>,
}

impl ConceptInfo {
    pub fn of(concept: &dyn Concept) -> Self {
        Self {
            id:          concept.id(),
            title:       concept.title(),
            description: concept.description(),
            cadence:     concept.cadence(),
            controls:    concept.controls(),
            actions:     concept.actions(),
        }
    }
}
