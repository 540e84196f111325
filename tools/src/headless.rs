//! Headless runner: mount one concept, drive it for N callbacks, report.

use anyhow::{Context, Result};
use qviz_core::{
    concept::ConceptId,
    config::RunnerConfig,
    params::ParamValue,
    progress::ProgressRecord,
    registry::ConceptRegistry,
    render::RecordingSurface,
    scheduler::FrameScheduler,
    snapshot::RunnerSnapshot,
    store::KvStore,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub concept:   ConceptId,
    /// Scheduler callbacks to process.
    pub frames:    u64,
    /// Parameter overrides applied before starting.
    pub overrides: Vec<(String, ParamValue)>,
    /// Actions fired, in order, after the frames have run.
    pub actions:   Vec<String>,
    /// Write the final frame as SVG here.
    pub svg_path:  Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadlessSummary {
    pub snapshot: RunnerSnapshot,
    pub rendered: u64,
    pub events:   usize,
    /// Progress after the run, when a store was supplied.
    pub progress: Option<ProgressRecord>,
}

/// Parse a `name=value` override. `true`/`false` are flags, anything
/// else must be a number.
pub fn parse_override(raw: &str) -> Result<(String, ParamValue)> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("override '{raw}' is not name=value"))?;
    let value = match value {
        "true" => ParamValue::Flag(true),
        "false" => ParamValue::Flag(false),
        v => ParamValue::Number(
            v.parse().with_context(|| format!("override '{raw}' has a non-numeric value"))?,
        ),
    };
    Ok((name.to_string(), value))
}

pub fn run_headless<S: FrameScheduler>(
    registry: &ConceptRegistry,
    scheduler: S,
    config: &RunnerConfig,
    options: &HeadlessOptions,
    store: Option<&KvStore>,
) -> Result<HeadlessSummary> {
    let mut runner = registry.mount(options.concept, scheduler, config)?;
    let mut surface = RecordingSurface::new();

    let completions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&completions);
    runner.on_completion(move |concept| sink.borrow_mut().push(concept));

    for (name, value) in &options.overrides {
        runner
            .adjust(name, *value, None)
            .with_context(|| format!("applying override {name}"))?;
    }

    runner.start();
    let rendered = runner.run_frames(&mut surface, options.frames);
    for action in &options.actions {
        runner
            .trigger(action, Some(&mut surface))
            .with_context(|| format!("firing action {action}"))?;
    }
    runner.pause();
    let events = runner.take_events().len();
    log::debug!("headless run of {} rendered {rendered} frames", options.concept);

    if let Some(path) = &options.svg_path {
        let frame = runner.redraw(Some(&mut surface));
        std::fs::write(path, frame.to_svg()).with_context(|| format!("writing {path}"))?;
    }

    let progress = match store {
        Some(store) => {
            for concept in completions.borrow().iter() {
                store.record_simulation_completed(concept.as_str())?;
            }
            Some(store.load_progress()?)
        }
        None => None,
    };

    Ok(HeadlessSummary {
        snapshot: runner.snapshot(),
        rendered,
        events,
        progress,
    })
}
