use crate::{
    concept::{Concept, ConceptId, Reaction},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, SurfaceSize},
    scene::SceneState,
    types::{FrameCount, LogicalTime},
};
use std::f64::consts::{PI, TAU};

const ORBITAL: &str = "orbital";

const SAMPLES_PER_FRAME: usize = 20;
const D_RADIUS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orbital {
    S1,
    S2,
    P2,
    D3,
}

impl Orbital {
    pub const ALL: [Orbital; 4] = [Self::S1, Self::S2, Self::P2, Self::D3];

    /// Orbital for a slider position; out-of-range indexes clamp.
    pub fn from_index(index: f64) -> Self {
        Self::ALL[(index.max(0.0) as usize).min(Self::ALL.len() - 1)]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::S1 => "1s",
            Self::S2 => "2s",
            Self::P2 => "2p",
            Self::D3 => "3d",
        }
    }

    pub fn shape(&self) -> &'static str {
        match self {
            Self::S1 => "Spherical, lowest energy orbital",
            Self::S2 => "Larger sphere with radial node",
            Self::P2 => "Dumbbell-shaped orbital",
            Self::D3 => "Complex cloverleaf pattern",
        }
    }

    /// Relative electron density at radius `r` (pixels) and polar angle
    /// `angle`, before the breathing modulation.
    pub fn density(&self, r: f64, angle: f64) -> f64 {
        match self {
            Self::S1 => (-r / 30.0).exp(),
            Self::S2 => (-r / 50.0).exp() * (r / 25.0).sin().powi(2),
            Self::P2 => (-r / 40.0).exp() * angle.cos().powi(2),
            Self::D3 => (2.0 * angle).cos().abs(),
        }
    }
}

/// Hydrogen-like orbitals drawn as density shells, with a sampled
/// electron cloud while running.
pub struct Orbitals;

impl Orbitals {
    /// One electron position relative to the nucleus, or `None` when the
    /// rejection step discards the draw.
    fn sample(orbital: Orbital, scene: &mut SceneState) -> Option<(f64, f64)> {
        let u = 1.0 - scene.rng().next_f64();
        let v = scene.rng().next_f64();
        match orbital {
            Orbital::S1 | Orbital::S2 => {
                let scale = if orbital == Orbital::S1 { 30.0 } else { 50.0 };
                let (r, a) = (-scale * u.ln(), v * TAU);
                Some((r * a.cos(), r * a.sin()))
            }
            Orbital::P2 => {
                let (r, a) = (-40.0 * u.ln(), v * TAU);
                if a.cos().powi(2) > scene.rng().next_f64() {
                    Some((r * a.cos(), r * a.sin()))
                } else {
                    None
                }
            }
            Orbital::D3 => {
                let (theta, phi) = (u * TAU, v * PI);
                Some((
                    D_RADIUS * phi.sin() * theta.cos(),
                    D_RADIUS * phi.sin() * theta.sin(),
                ))
            }
        }
    }
}

impl Concept for Orbitals {
    fn id(&self) -> ConceptId { ConceptId::Orbitals }
    fn title(&self) -> &'static str { "Atomic Orbitals" }
    fn description(&self) -> &'static str { "Electron probability distributions" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![ControlSpec::slider(ORBITAL, "Orbital (1s, 2s, 2p, 3d)", 0.0, 3.0, 1.0, 0.0)]
    }

    fn advance(
        &self,
        _frame: FrameCount,
        _time: LogicalTime,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> Vec<RunnerEvent> {
        let orbital = Orbital::from_index(params.number(ORBITAL));
        scene.cloud.clear();
        for _ in 0..SAMPLES_PER_FRAME {
            if let Some(point) = Self::sample(orbital, scene) {
                scene.cloud.push(point);
            }
        }
        Vec::new()
    }

    fn on_parameter(
        &self,
        name: &str,
        _frame: FrameCount,
        _params: &ParameterSet,
        scene: &mut SceneState,
    ) -> Reaction {
        if name == ORBITAL {
            scene.cloud.clear();
        }
        Reaction::none()
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
        let orbital = Orbital::from_index(params.number(ORBITAL));
        let breathe = 1.0 + (time * 0.1).sin() * 0.2;
        let alpha = |p: f64| (p * breathe * 0.7).clamp(0.0, 1.0);

        match orbital {
            Orbital::S1 | Orbital::S2 => {
                let (start, end) = if orbital == Orbital::S1 { (10, 100) } else { (20, 150) };
                for r in (start..end).step_by(5) {
                    let p = orbital.density(r as f64, 0.0);
                    if p > 0.0 {
                        frame.ring((cx, cy), r as f64, palette::BLUE.with_alpha(alpha(p)), 2.0);
                    }
                }
            }
            Orbital::P2 => {
                for step in 0..63 {
                    let angle = step as f64 * 0.1;
                    for r in (10..80).step_by(3) {
                        let p = orbital.density(r as f64, angle);
                        if p > 0.0 {
                            let at = (cx + r as f64 * angle.cos(), cy + r as f64 * angle.sin());
                            frame.circle(at, 2.0, palette::EMERALD.with_alpha(alpha(p)));
                        }
                    }
                }
            }
            Orbital::D3 => {
                for i in 0..126 {
                    let theta = i as f64 * 0.05;
                    for j in (0..63).step_by(3) {
                        let phi = j as f64 * 0.05;
                        let p = phi.sin().powi(2) * orbital.density(0.0, theta) * breathe;
                        if p > 0.1 {
                            let at = (
                                cx + D_RADIUS * phi.sin() * theta.cos(),
                                cy + D_RADIUS * phi.sin() * theta.sin(),
                            );
                            frame.circle(at, 1.5, palette::VIOLET.with_alpha((p * 0.7).min(1.0)));
                        }
                    }
                }
            }
        }

        frame.circle((cx, cy), 8.0, palette::RED);
        for &(dx, dy) in &scene.cloud {
            frame.circle((cx + dx, cy + dy), 2.0, palette::AMBER);
        }

        frame.text((10.0, 30.0), format!("{} Orbital", orbital.name()), palette::LABEL, 16.0);
        frame.text((cx + 15.0, cy - 10.0), "Nucleus", palette::LABEL, 16.0);
        frame.text((10.0, height - 20.0), orbital.shape(), palette::MUTED, 12.0);
        frame
    }
}
