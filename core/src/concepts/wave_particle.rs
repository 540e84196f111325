use crate::{
    concept::{Concept, ConceptId},
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, SurfaceSize},
    scene::SceneState,
    types::LogicalTime,
};

const FREQUENCY: &str = "frequency";
const AMPLITUDE: &str = "amplitude";
const PARTICLE_VIEW: &str = "particle_view";

const GRID_SPACING: f64 = 20.0;
const PARTICLE_COUNT: usize = 20;

/// A travelling wave that can be viewed as a continuous wave or as a
/// stream of particles riding it.
pub struct WaveParticle;

impl WaveParticle {
    fn wave_y(x: f64, time: LogicalTime, center_y: f64, amplitude: f64, frequency: f64) -> f64 {
        center_y + amplitude * (x * frequency * 0.02 + time * 0.1).sin()
    }
}

impl Concept for WaveParticle {
    fn id(&self) -> ConceptId { ConceptId::WaveParticle }
    fn title(&self) -> &'static str { "Wave-Particle Duality" }
    fn description(&self) -> &'static str { "Explore the fundamental nature of quantum particles" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::slider(FREQUENCY, "Frequency", 0.1, 5.0, 0.1, 1.0),
            ControlSpec::slider(AMPLITUDE, "Amplitude", 10.0, 100.0, 5.0, 50.0),
            ControlSpec::toggle(PARTICLE_VIEW, "Particle view", false),
        ]
    }

    fn render(
        &self,
        time: LogicalTime,
        params: &ParameterSet,
        _scene: &SceneState,
        size: SurfaceSize,
    ) -> Frame {
        let mut frame = Frame::new(size, time);
        let SurfaceSize { width, height } = size;
        let frequency = params.number(FREQUENCY);
        let amplitude = params.number(AMPLITUDE);
        let center_y = height / 2.0;

        let mut x = 0.0;
        while x < width {
            frame.line((x, 0.0), (x, height), palette::GRID, 1.0);
            x += GRID_SPACING;
        }
        let mut y = 0.0;
        while y < height {
            frame.line((0.0, y), (width, y), palette::GRID, 1.0);
            y += GRID_SPACING;
        }

        if params.flag(PARTICLE_VIEW) {
            for i in 0..PARTICLE_COUNT {
                let x = (i as f64 * 30.0 + time * 2.0).rem_euclid(width);
                let y = Self::wave_y(x, time, center_y, amplitude, frequency);
                frame.circle((x, y), 4.0, palette::AMBER);
            }
            frame.text((10.0, 20.0), "Particle view", palette::LABEL, 14.0);
        } else {
            let points = (0..width as usize)
                .step_by(2)
                .map(|px| {
                    let x = px as f64;
                    (x, Self::wave_y(x, time, center_y, amplitude, frequency))
                })
                .collect();
            frame.polyline(points, palette::CYAN, 3.0);
            frame.text((10.0, 20.0), "Wave view", palette::LABEL, 14.0);
        }
        frame
    }
}
