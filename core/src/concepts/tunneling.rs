use crate::{
    concept::{CompletionRule, Concept, ConceptId},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, SurfaceSize},
    scene::{Particle, ParticleKind, SceneState},
    scheduler::Cadence,
    types::{FrameCount, LogicalTime},
};
use std::time::Duration;

const ENERGY: &str = "energy";
const BARRIER_HEIGHT: &str = "barrier_height";
const BARRIER_WIDTH: &str = "barrier_width";

const EMISSION_CHANCE: f64 = 0.1;
const PARTICLE_SPEED: f64 = 4.0;
const WAVE_AMPLITUDE: f64 = 30.0;

/// Coordinate space particles move in, independent of the surface.
const SCENE_SPACE: SurfaceSize = SurfaceSize { width: 500.0, height: 300.0 };

/// Transmission coefficient through a rectangular barrier.
///
/// `energy` and `height` are in eV, `width` in slider units (tenths of
/// the illustrative length scale). Energies at or above the barrier
/// transmit fully.
pub fn transmission(energy: f64, height: f64, width: f64) -> f64 {
    if energy >= height {
        return 1.0;
    }
    if energy <= 0.0 {
        return 0.0;
    }
    let a = width / 10.0;
    let k = (2.0 * (height - energy)).sqrt() / 10.0;
    let s = (k * a).sinh();
    let t = 1.0 / (1.0 + (height * height * s * s) / (4.0 * energy * (height - energy)));
    t.clamp(0.0, 1.0)
}

struct Layout {
    base_y:        f64,
    energy_y:      f64,
    barrier_start: f64,
    barrier_end:   f64,
    barrier_top:   f64,
}

impl Layout {
    fn new(params: &ParameterSet, size: SurfaceSize) -> Self {
        let base_y = size.height * 0.7;
        let scale = size.height * 0.4;
        let barrier_start = size.width * 0.4;
        Self {
            base_y,
            energy_y:    base_y - params.number(ENERGY) / 100.0 * scale,
            barrier_start,
            barrier_end: barrier_start + params.number(BARRIER_WIDTH) / 100.0 * size.width * 0.3,
            barrier_top: base_y - params.number(BARRIER_HEIGHT) / 100.0 * scale,
        }
    }
}

/// Particles fired at a potential barrier either tunnel through or
/// reflect, with the barrier's transmission probability.
pub struct Tunneling;

impl Tunneling {
    fn probability(params: &ParameterSet) -> f64 {
        transmission(
            params.number(ENERGY),
            params.number(BARRIER_HEIGHT),
            params.number(BARRIER_WIDTH),
        )
    }
}

impl Concept for Tunneling {
    fn id(&self) -> ConceptId { ConceptId::Tunneling }
    fn title(&self) -> &'static str { "Quantum Tunneling" }
    fn description(&self) -> &'static str { "Particles passing through energy barriers" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::slider(ENERGY, "Particle energy (eV)", 10.0, 120.0, 5.0, 50.0),
            ControlSpec::slider(BARRIER_HEIGHT, "Barrier height (eV)", 20.0, 150.0, 5.0, 80.0),
            ControlSpec::slider(BARRIER_WIDTH, "Barrier width", 10.0, 100.0, 5.0, 50.0),
        ]
    }

    fn cadence(&self) -> Cadence {
        Cadence::interval_ms(50)
    }

    fn completion(&self) -> Option<CompletionRule> {
        Some(CompletionRule::AfterRunning(Duration::from_secs(10)))
    }

    fn advance(
        &self,
        frame: FrameCount,
        _time: LogicalTime,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> Vec<RunnerEvent> {
        let size = SCENE_SPACE;
        let layout = Layout::new(params, size);
        let probability = Self::probability(params);
        let mut events = Vec::new();

        let mut particles = std::mem::take(&mut scene.particles);
        for p in particles.iter_mut() {
            p.x += p.vx;
            let in_barrier = p.x >= layout.barrier_start && p.x <= layout.barrier_end;
            if p.kind != ParticleKind::Incident || p.vx <= 0.0 || !in_barrier {
                continue;
            }
            if scene.rng().chance(probability) {
                p.x = layout.barrier_end + 5.0;
                p.kind = ParticleKind::Tunneled;
                scene.counters.tunneled += 1;
                events.push(RunnerEvent::ParticleTunneled { frame });
            } else {
                p.vx = -p.vx;
                p.x = layout.barrier_start - 5.0;
                p.kind = ParticleKind::Reflected;
                scene.counters.reflected += 1;
                events.push(RunnerEvent::ParticleReflected { frame });
            }
        }
        particles.retain(|p| p.x > -10.0 && p.x < size.width + 10.0);

        if scene.rng().chance(EMISSION_CHANCE) {
            particles.push(Particle {
                x:    20.0,
                y:    layout.energy_y,
                vx:   PARTICLE_SPEED,
                kind: ParticleKind::Incident,
            });
            scene.counters.emitted += 1;
            events.push(RunnerEvent::ParticleEmitted { frame });
        }
        scene.particles = particles;
        events
    }

    fn render(
        &self,
        time: LogicalTime,
        params: &ParameterSet,
        scene: &SceneState,
        size: SurfaceSize,
    ) -> Frame {
        let mut frame = Frame::new(size, time);
        let layout = Layout::new(params, size);
        let probability = Self::probability(params);
        let k = params.number(ENERGY).sqrt() / 10.0;
        let phase = time * 0.1;

        frame.dashed_line((0.0, layout.energy_y), (size.width, layout.energy_y), palette::SKY, 2.0);
        frame.rect(
            layout.barrier_start,
            layout.barrier_top,
            layout.barrier_end - layout.barrier_start,
            layout.base_y - layout.barrier_top,
            palette::RED,
        );

        let incident = (0..layout.barrier_start as usize)
            .map(|px| {
                let x = px as f64;
                (x, layout.base_y - (k * x + phase).sin() * WAVE_AMPLITUDE)
            })
            .collect();
        frame.polyline(incident, palette::VIOLET, 3.0);

        if probability > 0.01 {
            let amp = probability.sqrt();
            let transmitted = (layout.barrier_end.ceil() as usize..size.width as usize)
                .map(|px| {
                    let x = px as f64;
                    (x, layout.base_y - (k * x + phase).sin() * amp * WAVE_AMPLITUDE)
                })
                .collect();
            frame.polyline(transmitted, palette::GREEN, 3.0 * amp);
        }

        // Particles live in scene space; scale to the surface.
        let sx = size.width / SCENE_SPACE.width;
        let sy = size.height / SCENE_SPACE.height;
        for p in &scene.particles {
            let color = match p.kind {
                ParticleKind::Incident  => palette::YELLOW,
                ParticleKind::Tunneled  => palette::GREEN,
                ParticleKind::Reflected => palette::RED,
            };
            frame.circle((p.x * sx, p.y * sy), 5.0, color);
        }

        frame.text(
            (10.0, 20.0),
            format!("Tunneling probability: {:.1}%", probability * 100.0),
            palette::LABEL,
            14.0,
        );
        frame.text(
            (10.0, 40.0),
            format!(
                "Tunneled: {}  Reflected: {}",
                scene.counters.tunneled, scene.counters.reflected
            ),
            palette::LABEL,
            12.0,
        );
        frame
    }
}
