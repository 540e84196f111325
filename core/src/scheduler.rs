//! Frame scheduling: the seam between a runner and the host's
//! "call me on the next refresh" primitive.
//!
//! RULES:
//!   - A runner holds at most one pending handle at a time.
//!   - Cancelling a handle that already fired (or was never issued) is a no-op.
//!   - `next_due` removes the handle it returns; firing is one-shot.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// How often a runner wants its frame callback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cadence {
    /// Once per display refresh.
    DisplayRefresh,
    /// Fixed timer, used by concepts that model discrete emission.
    Interval { millis: u64 },
}

impl Cadence {
    pub fn interval_ms(millis: u64) -> Self {
        Self::Interval { millis }
    }

    /// Wall-clock period of one callback. Display refresh uses the
    /// nominal refresh rate of the host.
    pub fn period(&self, nominal_fps: u32) -> Duration {
        match self {
            Self::DisplayRefresh     => Duration::from_secs_f64(1.0 / nominal_fps.max(1) as f64),
            Self::Interval { millis } => Duration::from_millis((*millis).max(1)),
        }
    }

    /// Callbacks per second at this cadence.
    pub fn callbacks_per_second(&self, nominal_fps: u32) -> f64 {
        match self {
            Self::DisplayRefresh      => nominal_fps.max(1) as f64,
            Self::Interval { millis } => 1000.0 / (*millis).max(1) as f64,
        }
    }
}

/// Opaque token identifying one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn raw(&self) -> u64 { self.0 }
}

/// The contract every host scheduler must fulfill.
pub trait FrameScheduler {
    /// Request one callback at the given cadence.
    fn request(&mut self, cadence: Cadence) -> FrameHandle;

    /// Cancel a pending callback. Unknown handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);

    /// Return the next callback that is due, removing it from the
    /// pending set. `None` when nothing is pending.
    fn next_due(&mut self) -> Option<FrameHandle>;
}

// ── Manual (fake clock) ────────────────────────────────────────

#[derive(Debug, Default)]
struct ManualState {
    next_id:     u64,
    now:         Duration,
    nominal_fps: u32,
    pending:     Vec<(FrameHandle, Duration)>,
    requested:   u64,
    cancelled:   u64,
    fired:       u64,
}

/// Deterministic scheduler driven by the caller. Virtual time jumps
/// straight to the earliest pending deadline on every `next_due`.
///
/// Cloning yields another handle to the same clock, so a test can keep
/// one copy to inspect pending callbacks after the runner is gone.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
    inner: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new(nominal_fps: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualState {
                nominal_fps,
                ..ManualState::default()
            })),
        }
    }

    /// Virtual time elapsed on this clock.
    pub fn now(&self) -> Duration { self.inner.borrow().now }

    pub fn pending_count(&self) -> usize { self.inner.borrow().pending.len() }
    pub fn requested_count(&self) -> u64 { self.inner.borrow().requested }
    pub fn cancelled_count(&self) -> u64 { self.inner.borrow().cancelled }
    pub fn fired_count(&self) -> u64 { self.inner.borrow().fired }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.inner.borrow().pending.iter().any(|(h, _)| *h == handle)
    }
}

impl Default for ManualScheduler {
    fn default() -> Self { Self::new(60) }
}

impl FrameScheduler for ManualScheduler {
    fn request(&mut self, cadence: Cadence) -> FrameHandle {
        let mut state = self.inner.borrow_mut();
        state.next_id += 1;
        state.requested += 1;
        let handle = FrameHandle(state.next_id);
        let due = state.now + cadence.period(state.nominal_fps);
        state.pending.push((handle, due));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        let mut state = self.inner.borrow_mut();
        let before = state.pending.len();
        state.pending.retain(|(h, _)| *h != handle);
        if state.pending.len() < before {
            state.cancelled += 1;
        }
    }

    fn next_due(&mut self) -> Option<FrameHandle> {
        let mut state = self.inner.borrow_mut();
        let idx = state
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (h, due))| (*due, *h))
            .map(|(i, _)| i)?;
        let (handle, due) = state.pending.remove(idx);
        state.now = state.now.max(due);
        state.fired += 1;
        Some(handle)
    }
}

// ── Paced (wall clock) ─────────────────────────────────────────

/// Real-time scheduler: `next_due` sleeps the calling thread until the
/// earliest pending deadline. Used by the headless runner when frames
/// should play at display speed.
#[derive(Debug)]
pub struct PacedScheduler {
    next_id:     u64,
    nominal_fps: u32,
    pending:     Vec<(FrameHandle, Instant)>,
}

impl PacedScheduler {
    pub fn new(nominal_fps: u32) -> Self {
        Self {
            next_id: 0,
            nominal_fps,
            pending: Vec::new(),
        }
    }
}

impl FrameScheduler for PacedScheduler {
    fn request(&mut self, cadence: Cadence) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push((handle, Instant::now() + cadence.period(self.nominal_fps)));
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.retain(|(h, _)| *h != handle);
    }

    fn next_due(&mut self) -> Option<FrameHandle> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (_, due))| *due)
            .map(|(i, _)| i)?;
        let (handle, due) = self.pending.remove(idx);
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }
        Some(handle)
    }
}
