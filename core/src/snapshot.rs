//! Runner snapshot: serializable view of one runner's state.
//!
//! Used by the headless runner for its JSON summary and by tests that
//! compare two runners.

use crate::{
    clock::SimulationClock,
    concept::ConceptId,
    params::ParameterSet,
    scene::SceneCounters,
    types::RunnerId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunnerSnapshot {
    pub runner_id:  RunnerId,
    pub concept:    ConceptId,
    pub clock:      SimulationClock,
    pub parameters: ParameterSet,
    pub counters:   SceneCounters,
    pub completed:  bool,
}
