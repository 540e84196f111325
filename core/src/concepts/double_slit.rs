use crate::{
    concept::{CompletionRule, Concept, ConceptId},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, SurfaceSize},
    scene::SceneState,
    types::{FrameCount, LogicalTime},
};
use std::time::Duration;

const OBSERVING: &str = "observing";
const INTENSITY: &str = "intensity";

/// Detector resolution along the screen.
pub const BINS: usize = 100;

const SLIT_OFFSET: f64 = 0.1;
const SLIT_HALF_HEIGHT: f64 = 20.0 / 300.0;
const PHASE_SCALE: f64 = 0.15;
const REJECTION_TRIES: usize = 32;
const BAR_LENGTH: f64 = 60.0;

/// Expected hit density at vertical position `y` (fraction of the
/// screen height, 0 at the top), normalized to at most 1.
///
/// Unobserved electrons interfere; observed ones pile up behind the
/// two slits.
pub fn fringe_intensity(y: f64, observing: bool) -> f64 {
    // Evaluated in a 500x300 reference box: slits at x=150, screen at x=400.
    let height = 300.0;
    let distance = 250.0;
    let py = y * height;
    let cy = height / 2.0;
    let upper = cy - SLIT_OFFSET * height;
    let lower = cy + SLIT_OFFSET * height;

    if observing {
        let band = |c: f64| (-(py - c).powi(2) / 200.0).exp();
        return (band(upper) + band(lower)).min(1.0);
    }
    let d1 = (distance * distance + (py - upper).powi(2)).sqrt();
    let d2 = (distance * distance + (py - lower).powi(2)).sqrt();
    let envelope = (-((py - cy) / (0.35 * height)).powi(2)).exp();
    ((d2 - d1) * PHASE_SCALE).cos().powi(2) * envelope
}

/// Electrons through two slits onto a detector screen, with an optional
/// which-path observer.
pub struct DoubleSlit;

impl Concept for DoubleSlit {
    fn id(&self) -> ConceptId { ConceptId::DoubleSlit }
    fn title(&self) -> &'static str { "Double-Slit Experiment" }
    fn description(&self) -> &'static str { "See how observation affects quantum behavior" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::toggle(OBSERVING, "Observe which slit", false),
            ControlSpec::slider(INTENSITY, "Beam intensity", 0.0, 100.0, 1.0, 50.0),
        ]
    }

    fn completion(&self) -> Option<CompletionRule> {
        Some(CompletionRule::AfterRunning(Duration::from_secs(5)))
    }

    fn advance(
        &self,
        _frame: FrameCount,
        _time: LogicalTime,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> Vec<RunnerEvent> {
        let observing = params.flag(OBSERVING);
        let hits = (params.number(INTENSITY) / 25.0).ceil().max(0.0) as usize;

        for _ in 0..hits {
            let y = if observing {
                let center = if scene.rng().coin() { 0.5 - SLIT_OFFSET } else { 0.5 + SLIT_OFFSET };
                Some(scene.rng().gaussian(center, 10.0 / 300.0))
            } else {
                (0..REJECTION_TRIES).find_map(|_| {
                    let y = scene.rng().next_f64();
                    let p = fringe_intensity(y, false);
                    scene.rng().chance(p).then_some(y)
                })
            };
            if let Some(y) = y.filter(|y| (0.0..1.0).contains(y)) {
                scene.record_hit((y * BINS as f64) as usize, BINS);
            }
        }
        Vec::new()
    }

    fn render(
        &self,
        time: LogicalTime,
        params: &ParameterSet,
        scene: &SceneState,
        size: SurfaceSize,
    ) -> Frame {
        let mut frame = Frame::new(size, time);
        let SurfaceSize { width, height } = size;
        let observing = params.flag(OBSERVING);
        let slit_x = width * 0.3;
        let screen_x = width * 0.8;
        let cy = height / 2.0;
        let upper = cy - SLIT_OFFSET * height;
        let lower = cy + SLIT_OFFSET * height;
        let half = SLIT_HALF_HEIGHT * height;

        // Barrier with two openings.
        frame.rect(slit_x - 5.0, 0.0, 10.0, upper - half, palette::MUTED);
        frame.rect(slit_x - 5.0, upper + half, 10.0, (lower - half) - (upper + half), palette::MUTED);
        frame.rect(slit_x - 5.0, lower + half, 10.0, height - (lower + half), palette::MUTED);
        frame.line((screen_x, 0.0), (screen_x, height), palette::LABEL, 2.0);

        if observing {
            let span = (slit_x - 50.0).max(1.0);
            for i in 0..12 {
                let x = 50.0 + (time * 3.0 + i as f64 * 10.0).rem_euclid(span);
                let y = if i % 2 == 0 { upper } else { lower };
                frame.circle((x, y), 3.0, palette::AMBER);
            }
            frame.circle((slit_x - 20.0, upper), 6.0, palette::RED);
            frame.circle((slit_x - 20.0, lower), 6.0, palette::RED);
        } else {
            let offset = (time * 2.0).rem_euclid(20.0);
            for source in [upper, lower] {
                let mut r = 10.0;
                while r < screen_x - slit_x {
                    frame.ring((slit_x, source), r + offset, palette::CYAN.with_alpha(0.3), 1.0);
                    r += 20.0;
                }
            }
        }

        let expected = (0..height as usize)
            .step_by(2)
            .map(|py| {
                let y = py as f64;
                (screen_x + 5.0 + fringe_intensity(y / height, observing) * BAR_LENGTH, y)
            })
            .collect();
        frame.polyline(expected, palette::VIOLET.with_alpha(0.5), 1.0);

        let max = scene.histogram.iter().copied().max().unwrap_or(0);
        if max > 0 {
            let bin_height = height / BINS as f64;
            let color = if observing { palette::AMBER } else { palette::CYAN };
            for (i, &count) in scene.histogram.iter().enumerate().filter(|(_, c)| **c > 0) {
                let len = count as f64 / max as f64 * BAR_LENGTH;
                frame.rect(screen_x + 5.0, i as f64 * bin_height, len, bin_height, color);
            }
        }

        frame.text((10.0, 20.0), "Electron source", palette::LABEL, 12.0);
        frame.text((slit_x - 30.0, height - 10.0), "Double slit", palette::LABEL, 12.0);
        frame.text((screen_x - 20.0, height - 10.0), "Screen", palette::LABEL, 12.0);
        frame.text(
            (10.0, 40.0),
            format!("Detected: {}", scene.counters.detected),
            palette::LABEL,
            12.0,
        );
        frame
    }
}
