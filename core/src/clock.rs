//! Simulation clock. Owns logical time and the run state.

use crate::types::{FrameCount, LogicalTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationClock {
    pub frames: FrameCount,
    pub step:   f64,
    pub state:  RunState,
}

impl SimulationClock {
    pub fn new(step: f64) -> Self {
        Self {
            frames: 0,
            step,
            state: RunState::Idle,
        }
    }

    /// Logical time is derived from the frame counter so that pausing,
    /// resuming and resetting can never accumulate drift.
    pub fn time(&self) -> LogicalTime {
        self.frames as f64 * self.step
    }

    /// Advance one frame. Returns the new frame number.
    /// Panics if called while not running; callers must check.
    pub fn advance(&mut self) -> FrameCount {
        assert!(self.is_running(), "advance() called on a stopped clock");
        self.frames += 1;
        self.frames
    }

    pub fn start(&mut self) { self.state = RunState::Running; }
    pub fn pause(&mut self) { self.state = RunState::Paused;  }

    pub fn reset(&mut self) {
        self.frames = 0;
        self.state = RunState::Idle;
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Paused,
}
