//! The simulation runner, one per mounted concept view.
//!
//! LIFECYCLE:
//!   idle → running ⇄ paused, reset → idle from either.
//!
//! RULES:
//!   - At most one scheduled callback is pending at any time.
//!   - A callback whose handle is not the pending one is ignored.
//!   - Logical time advances by a fixed step per callback, never by
//!     wall-clock delta; pause freezes it, resume continues from it.
//!   - A missing or disposed surface skips the frame silently.
//!   - Unmounting (or dropping) cancels the pending callback.
//!   - Parameter changes and actions take effect immediately, running
//!     or not; a reaction that halts pauses the run.
//!   - The event log is bounded; undrained events beyond the cap are
//!     dropped oldest first.

use crate::{
    clock::{RunState, SimulationClock},
    concept::{CompletionRule, Concept, ConceptId, Reaction},
    config::RunnerConfig,
    error::{VizError, VizResult},
    event::RunnerEvent,
    params::{ControlSpec, ParamValue, ParameterSet},
    render::{Frame, Surface, SurfaceSize},
    rng::SceneRng,
    scene::SceneState,
    scheduler::{Cadence, FrameHandle, FrameScheduler},
    snapshot::RunnerSnapshot,
    types::{FrameCount, LogicalTime, RunnerId},
};
use std::collections::VecDeque;
use uuid::Uuid;

/// What happened to one scheduler callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Time advanced and the frame was presented.
    Rendered,
    /// The surface was unavailable; nothing advanced.
    Skipped,
    /// The handle was not ours (cancelled or superseded).
    Stale,
}

type CompletionCallback = Box<dyn FnMut(ConceptId)>;

pub struct SimulationRunner<S: FrameScheduler> {
    pub id:           RunnerId,
    concept:          Box<dyn Concept>,
    controls:         Vec<ControlSpec>,
    params:           ParameterSet,
    clock:            SimulationClock,
    scene:            SceneState,
    scheduler:        S,
    cadence:          Cadence,
    pending:          Option<FrameHandle>,
    size:             SurfaceSize,
    completion:       Option<CompletionRule>,
    completion_frame: Option<FrameCount>,
    completed:        bool,
    on_complete:      Option<CompletionCallback>,
    last_frame:       Option<Frame>,
    events:           VecDeque<RunnerEvent>,
    event_cap:        usize,
    dropped_events:   u64,
}

impl<S: FrameScheduler> SimulationRunner<S> {
    /// Mount a runner for `concept`. Parameters start at the concept's
    /// defaults; the runner starts idle with nothing scheduled.
    pub fn new(concept: Box<dyn Concept>, scheduler: S, config: &RunnerConfig) -> Self {
        let controls = concept.controls();
        let params = ParameterSet::from_controls(&controls);
        let cadence = concept.cadence();
        let completion = concept.completion();
        let completion_frame = match completion {
            Some(CompletionRule::AfterRunning(d)) => {
                let per_sec = cadence.callbacks_per_second(config.nominal_fps);
                Some(((d.as_secs_f64() * per_sec).ceil() as FrameCount).max(1))
            }
            _ => None,
        };
        let rng = SceneRng::for_concept(config.seed, concept.id());
        let id = Uuid::new_v4().to_string();

        log::debug!(
            "runner {id} mounted: concept={} cadence={cadence:?} completion_frame={completion_frame:?}",
            concept.id()
        );

        Self {
            id,
            controls,
            params,
            clock: SimulationClock::new(config.frame_step),
            scene: SceneState::new(rng),
            scheduler,
            cadence,
            pending: None,
            size: SurfaceSize::new(config.surface_width, config.surface_height),
            completion,
            completion_frame,
            completed: false,
            on_complete: None,
            last_frame: None,
            events: VecDeque::new(),
            event_cap: config.event_log_cap.max(1),
            dropped_events: 0,
            concept,
        }
    }

    /// Register the one-shot completion callback.
    pub fn on_completion(&mut self, callback: impl FnMut(ConceptId) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    // ── Lifecycle ──────────────────────────────────────────────

    /// Begin (or resume) animating. No-op while already running.
    pub fn start(&mut self) {
        if self.clock.is_running() {
            return;
        }
        self.clock.start();
        self.schedule_next();
        self.record(RunnerEvent::Started {
            concept: self.concept.id(),
            frame:   self.clock.frames,
        });
        log::debug!("runner {} started at frame {}", self.id, self.clock.frames);
    }

    /// Stop animating and freeze logical time. No-op unless running.
    pub fn pause(&mut self) {
        if !self.clock.is_running() {
            return;
        }
        self.cancel_pending();
        self.clock.pause();
        self.record(RunnerEvent::Paused {
            concept: self.concept.id(),
            frame:   self.clock.frames,
        });
        log::debug!("runner {} paused at frame {}", self.id, self.clock.frames);
    }

    /// Stop, zero time, empty derived state and redraw frame zero.
    pub fn reset(&mut self, surface: Option<&mut dyn Surface>) {
        self.cancel_pending();
        self.clock.reset();
        self.scene.clear();
        self.completed = false;
        self.record(RunnerEvent::Reset { concept: self.concept.id() });
        self.redraw(surface);
        log::debug!("runner {} reset", self.id);
    }

    /// Tear the runner down. Equivalent to dropping it.
    pub fn unmount(self) {
        log::debug!("runner {} unmounted at frame {}", self.id, self.clock.frames);
    }

    // ── Parameters ─────────────────────────────────────────────

    /// Apply raw widget input: validate against the control, store it,
    /// let the concept react, and redraw immediately when not running (a
    /// running runner picks the value up on its next frame).
    pub fn adjust(
        &mut self,
        name: &str,
        raw: impl Into<ParamValue>,
        surface: Option<&mut dyn Surface>,
    ) -> VizResult<ParamValue> {
        let control = self
            .controls
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| VizError::UnknownParameter { name: name.into() })?;
        let value = control.accept(raw.into())?;
        self.params.set(name, value)?;
        self.record(RunnerEvent::ParameterChanged { name: name.into(), value });

        let reaction = self.concept.on_parameter(name, self.clock.frames, &self.params, &mut self.scene);
        self.apply_reaction(reaction);

        if !self.clock.is_running() {
            self.redraw(surface);
        }
        Ok(value)
    }

    /// Fire one of the concept's actions (a button press).
    pub fn trigger(&mut self, action: &str, surface: Option<&mut dyn Surface>) -> VizResult<()> {
        if !self.concept.actions().iter().any(|a| a.name == action) {
            return Err(VizError::UnknownAction { name: action.into() });
        }
        let reaction = self.concept.trigger(action, self.clock.frames, &self.params, &mut self.scene)?;
        log::debug!("runner {} action {action} at frame {}", self.id, self.clock.frames);
        self.apply_reaction(reaction);

        if !self.clock.is_running() {
            self.redraw(surface);
        }
        Ok(())
    }

    // ── Frames ─────────────────────────────────────────────────

    /// Scheduler callback. Advances one frame, runs the concept's update
    /// step, presents the frame and reschedules.
    pub fn on_frame(&mut self, handle: FrameHandle, surface: Option<&mut dyn Surface>) -> FrameOutcome {
        if self.pending != Some(handle) || !self.clock.is_running() {
            log::trace!("runner {} ignoring stale callback {:?}", self.id, handle);
            return FrameOutcome::Stale;
        }
        self.pending = None;

        let surface = match surface {
            Some(s) if s.is_available() => s,
            _ => {
                log::trace!("runner {} skipped frame: surface unavailable", self.id);
                self.schedule_next();
                return FrameOutcome::Skipped;
            }
        };

        let frame_no = self.clock.advance();
        let time = self.clock.time();
        let scene_events = self.concept.advance(frame_no, time, &self.params, &mut self.scene);
        let observed = scene_events.iter().any(RunnerEvent::is_observation);
        for event in scene_events {
            self.record(event);
        }

        let frame = self.concept.render(time, &self.params, &self.scene, self.size);
        surface.present(&frame);
        self.last_frame = Some(frame);

        self.check_completion(frame_no, observed);
        self.schedule_next();
        FrameOutcome::Rendered
    }

    /// Pull due callbacks from the scheduler and process them, up to
    /// `limit`. Returns the number of frames actually rendered. Stops
    /// early when nothing is pending (paused or idle).
    pub fn run_frames(&mut self, surface: &mut dyn Surface, limit: u64) -> u64 {
        let mut rendered = 0;
        let mut callbacks = 0;
        while callbacks < limit {
            let Some(handle) = self.scheduler.next_due() else { break };
            callbacks += 1;
            if self.on_frame(handle, Some(&mut *surface)) == FrameOutcome::Rendered {
                rendered += 1;
            }
        }
        rendered
    }

    /// Recompute the frame for the current time without advancing.
    pub fn redraw(&mut self, surface: Option<&mut dyn Surface>) -> &Frame {
        let frame = self.concept.render(self.clock.time(), &self.params, &self.scene, self.size);
        if let Some(s) = surface {
            if s.is_available() {
                s.present(&frame);
            }
        }
        self.last_frame.insert(frame)
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn concept_id(&self) -> ConceptId { self.concept.id() }
    pub fn state(&self) -> RunState { self.clock.state }
    pub fn frames(&self) -> FrameCount { self.clock.frames }
    pub fn time(&self) -> LogicalTime { self.clock.time() }
    pub fn is_completed(&self) -> bool { self.completed }
    pub fn has_pending(&self) -> bool { self.pending.is_some() }
    pub fn completion_frame(&self) -> Option<FrameCount> { self.completion_frame }
    pub fn parameters(&self) -> &ParameterSet { &self.params }
    pub fn controls(&self) -> &[ControlSpec] { &self.controls }
    pub fn scene(&self) -> &SceneState { &self.scene }
    pub fn last_frame(&self) -> Option<&Frame> { self.last_frame.as_ref() }
    pub fn scheduler(&self) -> &S { &self.scheduler }

    pub fn pending_events(&self) -> usize { self.events.len() }
    pub fn dropped_events(&self) -> u64 { self.dropped_events }

    /// Drain the event log.
    pub fn take_events(&mut self) -> Vec<RunnerEvent> {
        self.events.drain(..).collect()
    }

    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            runner_id:  self.id.clone(),
            concept:    self.concept.id(),
            clock:      self.clock.clone(),
            parameters: self.params.clone(),
            counters:   self.scene.counters.clone(),
            completed:  self.completed,
        }
    }

    // ── Internals ──────────────────────────────────────────────

    fn record(&mut self, event: RunnerEvent) {
        if self.events.len() >= self.event_cap {
            self.events.pop_front();
            self.dropped_events += 1;
        }
        self.events.push_back(event);
    }

    fn apply_reaction(&mut self, reaction: Reaction) {
        let observed = reaction.events.iter().any(RunnerEvent::is_observation);
        for event in reaction.events {
            self.record(event);
        }
        self.check_completion(self.clock.frames, observed);
        if reaction.halt {
            self.pause();
        }
    }

    fn schedule_next(&mut self) {
        debug_assert!(self.pending.is_none(), "second callback scheduled");
        self.cancel_pending();
        self.pending = Some(self.scheduler.request(self.cadence));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn check_completion(&mut self, frame: FrameCount, observed: bool) {
        if self.completed {
            return;
        }
        let done = match self.completion {
            Some(CompletionRule::AfterRunning(_)) => {
                self.completion_frame.is_some_and(|target| frame >= target)
            }
            Some(CompletionRule::OnObservation) => observed,
            None => false,
        };
        if !done {
            return;
        }
        self.completed = true;
        let concept = self.concept.id();
        self.record(RunnerEvent::SimulationCompleted { concept, frame });
        log::debug!("runner {} completed {concept} at frame {frame}", self.id);
        if let Some(callback) = self.on_complete.as_mut() {
            callback(concept);
        }
    }
}

impl<S: FrameScheduler> Drop for SimulationRunner<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
