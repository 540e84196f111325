use crate::{
    concept::{Concept, ConceptId},
    params::{ControlSpec, ParameterSet},
    render::{palette, Frame, Rgba, SurfaceSize},
    scene::SceneState,
    types::LogicalTime,
};

const POSITION_UNCERTAINTY: &str = "position_uncertainty";

/// Δp for a given Δx, in the same illustrative units. The product is
/// held near a constant and clamped to the plottable range.
pub fn momentum_uncertainty(position_uncertainty: f64) -> f64 {
    if position_uncertainty <= 0.0 {
        return 100.0;
    }
    (2500.0 / position_uncertainty).clamp(10.0, 100.0)
}

pub struct Uncertainty;

/// Gaussian packet over `[x0, x0 + span]` with the given spread, peak at
/// `baseline - peak`.
fn packet(frame: &mut Frame, x0: f64, span: f64, center: f64, spread: f64, baseline: f64, peak: f64, color: Rgba) {
    let sigma = spread.max(1.0);
    let curve: Vec<_> = (0..=span as usize)
        .step_by(2)
        .map(|dx| {
            let x = x0 + dx as f64;
            (x, baseline - peak * (-((x - center) / sigma).powi(2) / 2.0).exp())
        })
        .collect();
    let mut fill = curve.clone();
    fill.push((x0 + span, baseline));
    fill.push((x0, baseline));
    frame.polygon(fill, color.with_alpha(0.3));
    frame.polyline(curve, color, 2.0);
}

impl Concept for Uncertainty {
    fn id(&self) -> ConceptId { ConceptId::Uncertainty }
    fn title(&self) -> &'static str { "Heisenberg Uncertainty" }
    fn description(&self) -> &'static str { "Position and momentum cannot both be sharp" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![ControlSpec::slider(POSITION_UNCERTAINTY, "Position uncertainty (Δx)", 10.0, 100.0, 5.0, 50.0)]
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
        let dx = params.number(POSITION_UNCERTAINTY);
        let dp = momentum_uncertainty(dx);
        let half = width / 2.0;
        let baseline = height - 40.0;
        let peak = height * 0.5;
        let wobble = (time * 0.05).sin() * 10.0;

        frame.line((half, 0.0), (half, height), palette::GRID, 1.0);
        frame.line((0.0, baseline), (width, baseline), palette::GRID, 1.0);

        let spread = |u: f64| u / 100.0 * half * 0.3;
        packet(&mut frame, 10.0, half - 20.0, half / 2.0 + wobble, spread(dx), baseline, peak, palette::BLUE);
        packet(&mut frame, half + 10.0, half - 20.0, half * 1.5, spread(dp), baseline, peak, palette::RED);

        frame.text((10.0, 20.0), format!("Position Δx = {dx:.0}"), palette::BLUE, 12.0);
        frame.text((half + 10.0, 20.0), format!("Momentum Δp = {dp:.0}"), palette::RED, 12.0);
        frame.text(
            (10.0, height - 10.0),
            format!("Δx·Δp = {:.0}", dx * dp),
            palette::LABEL,
            12.0,
        );
        frame
    }
}
