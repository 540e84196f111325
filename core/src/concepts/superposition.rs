use crate::{
    concept::{ActionSpec, Concept, ConceptId, Reaction},
    error::{VizError, VizResult},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, SurfaceSize},
    scene::{SceneState, Spin},
    types::{FrameCount, LogicalTime},
};
use std::f64::consts::{PI, TAU};

const STATE_AMPLITUDE: &str = "state_amplitude";
const COHERENCE_TIME: &str = "coherence_time";
const MEASURE: &str = "measure";

const SPHERE_RADIUS: f64 = 120.0;
/// Phase clock per unit of logical time.
const PHASE_RATE: f64 = 0.02;

/// Probability of measuring |↑⟩ for a state amplitude in percent,
/// where 0 is pure |↑⟩ and 100 pure |↓⟩.
pub fn up_probability(amplitude: f64) -> f64 {
    let theta = amplitude.clamp(0.0, 100.0) / 100.0 * PI;
    (theta / 2.0).cos().powi(2)
}

/// A single spin on the Bloch sphere, precessing until measured.
pub struct Superposition;

impl Superposition {
    fn phase(time: LogicalTime, coherence: f64) -> f64 {
        time * PHASE_RATE * TAU / (coherence / 10.0).max(f64::EPSILON)
    }
}

impl Concept for Superposition {
    fn id(&self) -> ConceptId { ConceptId::Superposition }
    fn title(&self) -> &'static str { "Quantum Superposition" }
    fn description(&self) -> &'static str { "A spin is up and down at once until measured" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::slider(STATE_AMPLITUDE, "State amplitude (%)", 0.0, 100.0, 5.0, 70.0),
            ControlSpec::slider(COHERENCE_TIME, "Coherence time", 20.0, 200.0, 10.0, 100.0),
        ]
    }

    fn actions(&self) -> Vec<ActionSpec> {
        vec![ActionSpec::new(MEASURE, "Measure state")]
    }

    fn trigger(
        &self,
        action: &str,
        frame: FrameCount,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> VizResult<Reaction> {
        if action != MEASURE {
            return Err(VizError::UnknownAction { name: action.into() });
        }
        if scene.measured.is_some() {
            return Ok(Reaction::halt());
        }
        let up = scene.rng().next_f64() < up_probability(params.number(STATE_AMPLITUDE));
        let spin = if up { Spin::Up } else { Spin::Down };
        scene.measured = Some(spin);
        scene.counters.measurements += 1;
        Ok(Reaction::halt().with_event(RunnerEvent::StateMeasured { frame, spin }))
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
        let (cx, cy) = (width / 2.0, height / 2.0);
        let r = SPHERE_RADIUS.min(height / 2.0 - 20.0).max(10.0);
        let label_x = (cx + r + 20.0).min(width - 110.0);

        frame.ring((cx, cy), r, palette::MUTED, 2.0);
        frame.line((cx, cy - r - 20.0), (cx, cy + r + 20.0), palette::MUTED, 1.0);

        if let Some(spin) = scene.measured {
            let (tip, color, ket) = match spin {
                Spin::Up   => ((cx, cy - r), palette::GREEN, "↑"),
                Spin::Down => ((cx, cy + r), palette::RED, "↓"),
            };
            frame.line((cx, cy), tip, color, 6.0);
            frame.circle(tip, 12.0, color);
            frame.text((label_x, cy - 20.0), format!("State: |{ket}⟩"), color, 20.0);
            frame.text((label_x, cy + 10.0), format!("P({ket}) = 100%"), color, 20.0);
            return frame;
        }

        frame.line((cx - r - 20.0, cy), (cx + r + 20.0, cy), palette::MUTED, 1.0);
        frame.text((cx - 10.0, cy - r - 10.0), "|↑⟩", palette::LABEL, 14.0);
        frame.text((cx - 10.0, cy + r + 25.0), "|↓⟩", palette::LABEL, 14.0);

        let amplitude = params.number(STATE_AMPLITUDE);
        let theta = amplitude / 100.0 * PI;
        let phi = Self::phase(time, params.number(COHERENCE_TIME));
        let tip = (cx + theta.sin() * phi.cos() * r, cy - theta.cos() * r);
        frame.line((cx, cy), tip, palette::BLUE, 4.0);
        frame.circle(tip, 8.0, palette::BLUE);

        let up = up_probability(amplitude);
        let down = 1.0 - up;
        frame.circle((cx, cy - r), 30.0 * up, palette::GREEN.with_alpha(up * 0.3));
        frame.circle((cx, cy + r), 30.0 * down, palette::RED.with_alpha(down * 0.3));

        frame.text((label_x, cy - 60.0), format!("P(↑) = {:.1}%", up * 100.0), palette::GREEN, 16.0);
        frame.text((label_x, cy - 30.0), format!("P(↓) = {:.1}%", down * 100.0), palette::RED, 16.0);
        frame.text((label_x, cy + 10.0), format!("φ = {:.2} rad", phi.rem_euclid(TAU)), palette::VIOLET, 16.0);
        frame
    }
}
