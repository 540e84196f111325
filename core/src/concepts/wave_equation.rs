use crate::{
    concept::{Concept, ConceptId},
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, SurfaceSize},
    scene::SceneState,
    types::LogicalTime,
};

const POTENTIAL: &str = "potential";
const ENERGY: &str = "energy";

/// Pixels per unit of x.
const X_SCALE: f64 = 100.0;
const ENERGY_SCALE: f64 = 40.0;
const PSI_SCALE: f64 = 30.0;

/// Simplified harmonic-oscillator wave function Ψ(x, t): a Gaussian
/// envelope set by the potential strength times a travelling cosine set
/// by the energy.
pub fn wave_function(x: f64, potential: f64, energy: f64, time: LogicalTime) -> f64 {
    (-potential * x * x / 2.0).exp() * (energy.max(0.0).sqrt() * x + time * 0.1).cos()
}

/// Harmonic potential V(x) = ω·x².
pub fn harmonic_potential(x: f64, potential: f64) -> f64 {
    potential * x * x
}

/// The time-dependent Schrödinger equation for a particle in a harmonic
/// well: the potential, the energy level, Ψ and |Ψ|².
pub struct WaveEquation;

impl Concept for WaveEquation {
    fn id(&self) -> ConceptId { ConceptId::WaveEquation }
    fn title(&self) -> &'static str { "Schrödinger Equation" }
    fn description(&self) -> &'static str { "The fundamental equation of quantum mechanics" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![
            ControlSpec::slider(POTENTIAL, "Potential strength (ω)", 0.5, 3.0, 0.1, 1.0),
            ControlSpec::slider(ENERGY, "Energy level (ℏω)", 0.5, 4.0, 0.1, 2.0),
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
        let potential = params.number(POTENTIAL);
        let energy = params.number(ENERGY);
        let center_y = height / 2.0;
        let level = center_y - energy * ENERGY_SCALE;
        let to_x = |px: f64| (px - width / 2.0) / X_SCALE;

        let mut g = 0.0;
        while g < width {
            frame.line((g, 0.0), (g, height), palette::GRID, 1.0);
            g += 40.0;
        }
        g = 0.0;
        while g < height {
            frame.line((0.0, g), (width, g), palette::GRID, 1.0);
            g += 40.0;
        }

        let columns = || (0..width as usize).map(|px| px as f64);

        let well = columns()
            .map(|px| (px, center_y - harmonic_potential(to_x(px), potential) * 20.0))
            .collect();
        frame.polyline(well, palette::RED, 3.0);

        frame.dashed_line((0.0, level), (width, level), palette::EMERALD, 1.0);

        let psi: Vec<_> = columns()
            .map(|px| (px, level + wave_function(to_x(px), potential, energy, time) * PSI_SCALE))
            .collect();
        frame.polyline(psi, palette::BLUE, 2.0);

        let mut density: Vec<_> = vec![(0.0, level)];
        density.extend(columns().map(|px| {
            let p = wave_function(to_x(px), potential, energy, time).powi(2);
            (px, level + p * PSI_SCALE)
        }));
        density.push((width, level));
        frame.polygon(density, palette::BLUE.with_alpha(0.3));

        frame.text((10.0, 30.0), "Ψ(x,t)", palette::LABEL, 14.0);
        frame.text((width - 50.0, 30.0), "V(x)", palette::LABEL, 14.0);
        frame.text((width - 30.0, level - 10.0), "E", palette::LABEL, 14.0);
        frame.text((10.0, height - 20.0), "iℏ ∂Ψ/∂t = ĤΨ", palette::CYAN, 16.0);
        frame
    }
}
