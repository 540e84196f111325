use crate::{
    concept::{Concept, ConceptId},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, Rgba, SurfaceSize},
    scene::{SceneState, Spin},
    scheduler::Cadence,
    types::{FrameCount, LogicalTime},
};

const ENTANGLED: &str = "entangled";
const MEASURE_RATE: &str = "measure_rate";

const CALLBACKS_PER_SECOND: f64 = 10.0;
const RADIUS: f64 = 30.0;

/// A pair of spins measured at random moments. Entangled pairs always
/// come out opposite; independent pairs agree half the time.
pub struct Entanglement;

fn spin_color(spin: Option<Spin>) -> Rgba {
    match spin {
        Some(Spin::Up)   => palette::BLUE,
        Some(Spin::Down) => palette::RED,
        None             => palette::VIOLET,
    }
}

impl Concept for Entanglement {
    fn id(&self) -> ConceptId { ConceptId::Entanglement }
    fn title(&self) -> &'static str { "Quantum Entanglement" }
    fn description(&self) -> &'static str { "Spooky action at a distance" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::toggle(ENTANGLED, "Entangled pair", true),
            ControlSpec::slider(MEASURE_RATE, "Measurements per second", 1.0, 10.0, 1.0, 3.0),
        ]
    }

    fn cadence(&self) -> Cadence {
        Cadence::interval_ms(100)
    }

    fn advance(
        &self,
        frame: FrameCount,
        _time: LogicalTime,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> Vec<RunnerEvent> {
        let rate = params.number(MEASURE_RATE) / CALLBACKS_PER_SECOND;
        if !scene.rng().chance(rate) {
            return Vec::new();
        }
        let rng = scene.rng();
        let a = if rng.coin() { Spin::Up } else { Spin::Down };
        let b = if params.flag(ENTANGLED) {
            a.flipped()
        } else if rng.coin() {
            Spin::Up
        } else {
            Spin::Down
        };
        let correlated = a != b;

        scene.spins = Some((a, b));
        scene.counters.measurements += 1;
        if correlated {
            scene.counters.correlations += 1;
        }
        vec![RunnerEvent::SpinsMeasured { frame, a, b, correlated }]
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
        let cy = height / 2.0;
        let left = (width * 0.25, cy);
        let right = (width * 0.75, cy);
        let entangled = params.flag(ENTANGLED);

        if entangled {
            let link = (0..=((right.0 - left.0) as usize))
                .step_by(3)
                .map(|dx| {
                    let x = left.0 + dx as f64;
                    (x, cy + (x * 0.05 + time * 0.3).sin() * 10.0)
                })
                .collect();
            frame.polyline(link, palette::VIOLET.with_alpha(0.6), 2.0);
        } else {
            frame.dashed_line(left, right, palette::MUTED, 1.0);
        }

        let (a, b) = match scene.spins {
            Some((a, b)) => (Some(a), Some(b)),
            None => (None, None),
        };
        for (center, spin, name) in [(left, a, "A"), (right, b, "B")] {
            frame.circle(center, RADIUS, spin_color(spin));
            if let Some(spin) = spin {
                let dy = if spin == Spin::Up { -RADIUS * 0.7 } else { RADIUS * 0.7 };
                frame.line((center.0, center.1 - dy), (center.0, center.1 + dy), palette::LABEL, 3.0);
            }
            frame.text((center.0 - 5.0, center.1 + RADIUS + 20.0), name, palette::LABEL, 14.0);
        }

        let c = &scene.counters;
        let share = if c.measurements == 0 {
            0.0
        } else {
            c.correlations as f64 / c.measurements as f64 * 100.0
        };
        frame.text(
            (10.0, 20.0),
            format!(
                "Measurements: {}  Anti-correlated: {} ({share:.0}%)",
                c.measurements, c.correlations
            ),
            palette::LABEL,
            12.0,
        );
        frame
    }
}
