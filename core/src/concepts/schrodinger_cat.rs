use crate::{
    concept::{CompletionRule, Concept, ConceptId, Reaction},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, SurfaceSize},
    scene::{CatState, SceneState},
    scheduler::Cadence,
    types::{FrameCount, LogicalTime},
};

const BOX_OPEN: &str = "box_open";
const INITIAL_DECAY: &str = "initial_decay";

const DECAY_PER_TICK: f64 = 0.5;
const MAX_DECAY: f64 = 95.0;

/// Probability (percent) that the atom has decayed, given the starting
/// value and the decay accumulated while the box stayed closed.
pub fn decay_probability(initial: f64, accumulated: f64) -> f64 {
    (initial + accumulated).clamp(0.0, MAX_DECAY)
}

pub struct SchrodingerCat;

impl SchrodingerCat {
    /// Collapse a cat still in superposition. No-op once observed.
    fn collapse(frame: FrameCount, params: &ParameterSet, scene: &mut SceneState) -> Option<RunnerEvent> {
        if scene.cat != CatState::Superposition {
            return None;
        }
        let p = decay_probability(params.number(INITIAL_DECAY), scene.decay_level);
        let dead = scene.rng().next_f64() * 100.0 < p;
        scene.cat = if dead { CatState::Dead } else { CatState::Alive };
        scene.counters.measurements += 1;
        log::debug!("cat observed at frame {frame}: decay={p:.1}% alive={}", !dead);
        Some(RunnerEvent::CatObserved { frame, alive: !dead })
    }
}

impl Concept for SchrodingerCat {
    fn id(&self) -> ConceptId { ConceptId::SchrodingerCat }
    fn title(&self) -> &'static str { "Schrödinger's Cat" }
    fn description(&self) -> &'static str { "Superposition until the box is opened" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::toggle(BOX_OPEN, "Open the box", false),
            ControlSpec::slider(INITIAL_DECAY, "Initial decay probability (%)", 0.0, 95.0, 5.0, 50.0),
        ]
    }

    fn cadence(&self) -> Cadence {
        Cadence::interval_ms(100)
    }

    fn completion(&self) -> Option<CompletionRule> {
        Some(CompletionRule::OnObservation)
    }

    fn advance(
        &self,
        frame: FrameCount,
        _time: LogicalTime,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> Vec<RunnerEvent> {
        if params.flag(BOX_OPEN) {
            // Box left open across a reset.
            return Self::collapse(frame, params, scene).into_iter().collect();
        }
        if scene.cat == CatState::Superposition
            && decay_probability(params.number(INITIAL_DECAY), scene.decay_level) < MAX_DECAY
        {
            scene.decay_level += DECAY_PER_TICK;
        }
        Vec::new()
    }

    fn on_parameter(
        &self,
        name: &str,
        frame: FrameCount,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> Reaction {
        if name != BOX_OPEN {
            return Reaction::none();
        }
        if params.flag(BOX_OPEN) {
            let mut reaction = Reaction::halt();
            reaction.events.extend(Self::collapse(frame, params, scene));
            return reaction;
        }
        scene.cat = CatState::Superposition;
        scene.decay_level = 0.0;
        Reaction::none().with_event(RunnerEvent::BoxClosed { frame })
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
        let (cx, cy) = (width / 2.0, height / 2.0 - 20.0);
        let (bw, bh) = (200.0, 120.0);
        let p = decay_probability(params.number(INITIAL_DECAY), scene.decay_level);

        match scene.cat {
            CatState::Superposition => {
                frame.rect(cx - bw / 2.0, cy - bh / 2.0, bw, bh, palette::GRID);
                let pulse = 6.0 + 2.0 * (time * 0.5).sin();
                frame.circle((cx - 60.0, cy), pulse, palette::VIOLET);
                frame.text((cx - 8.0, cy + 10.0), "?", palette::LABEL, 32.0);
                frame.text((cx - 60.0, cy + bh / 2.0 + 20.0), "|alive⟩ + |dead⟩", palette::VIOLET, 14.0);
            }
            CatState::Alive | CatState::Dead => {
                let alive = scene.cat == CatState::Alive;
                let color = if alive { palette::GREEN } else { palette::RED };
                frame.rect(cx - bw / 2.0, cy - bh / 2.0, bw, bh, palette::GRID.with_alpha(0.4));
                frame.circle((cx, cy), 30.0, color);
                let label = if alive { "ALIVE" } else { "DEAD" };
                frame.text((cx - 24.0, cy + bh / 2.0 + 20.0), label, color, 16.0);
            }
        }

        let meter_w = width - 40.0;
        frame.rect(20.0, height - 30.0, meter_w, 10.0, palette::GRID);
        frame.rect(20.0, height - 30.0, meter_w * p / 100.0, 10.0, palette::AMBER);
        frame.text(
            (20.0, height - 40.0),
            format!("Decay probability: {p:.1}%"),
            palette::LABEL,
            12.0,
        );
        frame
    }
}
