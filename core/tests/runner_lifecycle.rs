//! Runner lifecycle: start/pause/reset, cancellation and completion.
//!
//! Every test drives the runner with the ManualScheduler fake clock and
//! keeps a second handle to it to observe pending callbacks.

use qviz_core::{
    clock::RunState,
    concept::ConceptId,
    config::AppConfig,
    event::RunnerEvent,
    registry::ConceptRegistry,
    render::RecordingSurface,
    runner::{FrameOutcome, SimulationRunner},
    scene::CatState,
    scheduler::{FrameScheduler, ManualScheduler},
};
use std::cell::Cell;
use std::rc::Rc;

fn mount(id: ConceptId) -> (SimulationRunner<ManualScheduler>, ManualScheduler) {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = AppConfig::default_test().runner;
    let clock = ManualScheduler::default();
    let runner = ConceptRegistry::standard()
        .mount(id, clock.clone(), &config)
        .expect("mount");
    (runner, clock)
}

#[test]
fn mounted_runner_is_idle_with_nothing_scheduled() {
    let (runner, clock) = mount(ConceptId::WaveParticle);
    assert_eq!(runner.state(), RunState::Idle);
    assert_eq!(runner.frames(), 0);
    assert_eq!(runner.time(), 0.0);
    assert_eq!(clock.pending_count(), 0);
    assert!(!runner.has_pending());
}

#[test]
fn start_is_idempotent() {
    let (mut runner, clock) = mount(ConceptId::WaveParticle);
    runner.start();
    runner.start();
    runner.start();
    assert_eq!(runner.state(), RunState::Running);
    assert_eq!(clock.pending_count(), 1);
    assert_eq!(clock.requested_count(), 1, "start while running must not reschedule");
}

#[test]
fn pause_then_start_resumes_logical_time() {
    let (mut runner, clock) = mount(ConceptId::WaveParticle);
    let mut surface = RecordingSurface::new();

    runner.start();
    assert_eq!(runner.run_frames(&mut surface, 10), 10);
    assert_eq!(runner.time(), 10.0);

    runner.pause();
    assert_eq!(runner.state(), RunState::Paused);
    assert_eq!(clock.pending_count(), 0);

    // Nothing is due while paused; time stays frozen.
    assert_eq!(runner.run_frames(&mut surface, 10), 0);
    assert_eq!(runner.time(), 10.0);
    assert_eq!(surface.presented(), 10);

    runner.start();
    assert_eq!(runner.run_frames(&mut surface, 5), 5);
    assert_eq!(runner.time(), 15.0, "resume must continue from the paused value");
}

#[test]
fn unmount_while_running_cancels_pending_callback() {
    let (mut runner, clock) = mount(ConceptId::Tunneling);
    let mut surface = RecordingSurface::new();
    runner.start();
    runner.run_frames(&mut surface, 3);
    assert_eq!(clock.pending_count(), 1);

    runner.unmount();
    assert_eq!(clock.pending_count(), 0);
    assert_eq!(clock.cancelled_count(), 1);

    let mut sched = clock.clone();
    assert!(sched.next_due().is_none(), "no callback may fire after unmount");
    assert_eq!(surface.presented(), 3);
}

#[test]
fn dropping_a_running_runner_cancels_too() {
    let (mut runner, clock) = mount(ConceptId::Entanglement);
    runner.start();
    drop(runner);
    assert_eq!(clock.pending_count(), 0);
}

#[test]
fn callback_arriving_after_pause_is_ignored() {
    let (mut runner, clock) = mount(ConceptId::WaveParticle);
    let mut surface = RecordingSurface::new();
    runner.start();

    // The host already dequeued the callback when the pause lands.
    let mut sched = clock.clone();
    let handle = sched.next_due().expect("pending callback");
    runner.pause();

    assert_eq!(runner.on_frame(handle, Some(&mut surface)), FrameOutcome::Stale);
    assert_eq!(runner.frames(), 0);
    assert_eq!(surface.presented(), 0);
    assert_eq!(clock.pending_count(), 0);
}

#[test]
fn unavailable_surface_skips_frame_without_advancing() {
    let (mut runner, clock) = mount(ConceptId::WaveParticle);
    runner.start();
    let mut sched = clock.clone();

    let handle = sched.next_due().expect("pending callback");
    assert_eq!(runner.on_frame(handle, None), FrameOutcome::Skipped);
    assert_eq!(runner.frames(), 0);
    assert_eq!(clock.pending_count(), 1, "runner keeps its loop alive");

    let mut disposed = RecordingSurface::new();
    disposed.dispose();
    let handle = sched.next_due().expect("rescheduled callback");
    assert_eq!(runner.on_frame(handle, Some(&mut disposed)), FrameOutcome::Skipped);
    assert_eq!(disposed.presented(), 0);
    assert_eq!(runner.frames(), 0);
}

#[test]
fn reset_twice_equals_reset_once() {
    let (mut runner, clock) = mount(ConceptId::Tunneling);
    let mut surface = RecordingSurface::new();
    runner.start();
    runner.run_frames(&mut surface, 80);
    assert!(runner.scene().counters.emitted > 0);

    runner.reset(Some(&mut surface));
    let once = runner.snapshot();
    let frame_once = runner.last_frame().cloned();

    runner.reset(Some(&mut surface));
    assert_eq!(runner.snapshot(), once);
    assert_eq!(runner.last_frame().cloned(), frame_once);

    assert_eq!(runner.state(), RunState::Idle);
    assert_eq!(runner.frames(), 0);
    assert!(runner.scene().is_empty());
    assert_eq!(clock.pending_count(), 0);
    assert_eq!(frame_once.map(|f| f.time), Some(0.0));
}

#[test]
fn reset_replays_the_same_scene() {
    let (mut runner, _clock) = mount(ConceptId::Tunneling);
    let mut surface = RecordingSurface::new();

    runner.start();
    runner.run_frames(&mut surface, 120);
    let first = runner.snapshot().counters;

    runner.reset(None);
    runner.start();
    runner.run_frames(&mut surface, 120);
    assert_eq!(runner.snapshot().counters, first);
}

#[test]
fn rapid_toggling_never_leaves_two_callbacks() {
    let (mut runner, clock) = mount(ConceptId::DoubleSlit);
    for _ in 0..50 {
        runner.start();
        assert!(clock.pending_count() <= 1);
        runner.pause();
        assert_eq!(clock.pending_count(), 0);
        runner.start();
        runner.start();
        assert_eq!(clock.pending_count(), 1);
        runner.reset(None);
        assert_eq!(clock.pending_count(), 0);
    }
}

#[test]
fn adjust_redraws_only_when_not_running() {
    let (mut runner, _clock) = mount(ConceptId::WaveParticle);
    let mut surface = RecordingSurface::new();

    runner.adjust("amplitude", 80.0, Some(&mut surface)).expect("adjust idle");
    assert_eq!(surface.presented(), 1);

    runner.start();
    runner.adjust("amplitude", 60.0, Some(&mut surface)).expect("adjust running");
    assert_eq!(surface.presented(), 1, "running runner picks the value up next frame");

    runner.run_frames(&mut surface, 1);
    runner.pause();
    runner.adjust("frequency", 2.0, Some(&mut surface)).expect("adjust paused");
    assert_eq!(surface.presented(), 3);
    assert_eq!(runner.time(), 1.0, "redraw does not advance time");
}

#[test]
fn timed_completion_fires_once() {
    let (mut runner, _clock) = mount(ConceptId::DoubleSlit);
    let mut surface = RecordingSurface::new();
    let fired = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&fired);
    runner.on_completion(move |concept| {
        assert_eq!(concept, ConceptId::DoubleSlit);
        counter.set(counter.get() + 1);
    });

    // 5 s at 60 callbacks per second.
    assert_eq!(runner.completion_frame(), Some(300));

    runner.start();
    runner.run_frames(&mut surface, 299);
    assert!(!runner.is_completed());
    assert_eq!(fired.get(), 0);

    runner.run_frames(&mut surface, 1);
    assert!(runner.is_completed());
    assert_eq!(fired.get(), 1);

    runner.run_frames(&mut surface, 100);
    assert_eq!(fired.get(), 1);

    let completions = runner
        .take_events()
        .into_iter()
        .filter(|e| matches!(e, RunnerEvent::SimulationCompleted { .. }))
        .count();
    assert_eq!(completions, 1);
}

#[test]
fn interval_concepts_convert_duration_at_their_own_cadence() {
    let (runner, _clock) = mount(ConceptId::Tunneling);
    // 10 s at one callback per 50 ms.
    assert_eq!(runner.completion_frame(), Some(200));

    let (runner, _clock) = mount(ConceptId::WaveParticle);
    assert_eq!(runner.completion_frame(), None);
}

#[test]
fn pausing_does_not_count_toward_completion() {
    let (mut runner, clock) = mount(ConceptId::Tunneling);
    let mut surface = RecordingSurface::new();
    runner.start();
    runner.run_frames(&mut surface, 150);
    runner.pause();
    let paused_at = clock.now();

    runner.start();
    runner.run_frames(&mut surface, 49);
    assert!(!runner.is_completed());
    runner.run_frames(&mut surface, 1);
    assert!(runner.is_completed());
    assert!(clock.now() > paused_at);
}

#[test]
fn opening_the_box_completes_on_observation() {
    let (mut runner, _clock) = mount(ConceptId::SchrodingerCat);
    let mut surface = RecordingSurface::new();
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    runner.on_completion(move |_| flag.set(true));

    runner.start();
    runner.run_frames(&mut surface, 20);
    assert!(!runner.is_completed());
    assert_eq!(runner.scene().cat, CatState::Superposition);

    runner.adjust("box_open", true, Some(&mut surface)).expect("open box");
    assert!(runner.is_completed());
    assert!(fired.get());
    assert_ne!(runner.scene().cat, CatState::Superposition);
    assert_eq!(runner.state(), RunState::Paused, "opening the box stops the experiment");
    assert!(!runner.has_pending());
}

#[test]
fn opening_the_box_while_idle_collapses_at_once() {
    let (mut runner, clock) = mount(ConceptId::SchrodingerCat);
    let mut surface = RecordingSurface::new();

    runner.adjust("box_open", true, Some(&mut surface)).expect("open box");
    assert_ne!(runner.scene().cat, CatState::Superposition);
    assert!(runner.is_completed());
    assert_eq!(runner.state(), RunState::Idle);
    assert_eq!(clock.pending_count(), 0);
    assert_eq!(surface.presented(), 1, "idle adjust redraws the collapsed cat");

    let events = runner.take_events();
    assert!(events.iter().any(|e| matches!(e, RunnerEvent::CatObserved { frame: 0, .. })));
}

#[test]
fn closing_the_box_restores_superposition() {
    let (mut runner, _clock) = mount(ConceptId::SchrodingerCat);
    let mut surface = RecordingSurface::new();

    runner.start();
    runner.run_frames(&mut surface, 10);
    runner.adjust("box_open", true, Some(&mut surface)).expect("open box");
    let collapsed = runner.scene().cat;
    assert_ne!(collapsed, CatState::Superposition);

    runner.adjust("box_open", false, Some(&mut surface)).expect("close box");
    assert_eq!(runner.scene().cat, CatState::Superposition);
    assert_eq!(runner.scene().decay_level, 0.0);

    runner.start();
    runner.run_frames(&mut surface, 50);
    assert_eq!(runner.scene().cat, CatState::Superposition);
    assert_eq!(runner.scene().decay_level, 25.0);
}

#[test]
fn undrained_event_log_stays_bounded() {
    let (mut runner, _clock) = mount(ConceptId::Tunneling);
    let mut surface = RecordingSurface::new();
    let cap = AppConfig::default_test().runner.event_log_cap;

    runner.start();
    runner.run_frames(&mut surface, 10_000);
    assert_eq!(runner.frames(), 10_000);
    assert!(runner.pending_events() <= cap);
    assert!(runner.dropped_events() > 0);

    let drained = runner.take_events();
    assert!(drained.len() <= cap);
    assert_eq!(runner.pending_events(), 0);
    assert!(!drained.iter().any(|e| matches!(e, RunnerEvent::Started { .. })), "oldest events go first");
}
