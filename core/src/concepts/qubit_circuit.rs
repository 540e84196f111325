use crate::{
    concept::{ActionSpec, Concept, ConceptId, Reaction},
    error::{VizError, VizResult},
    event::RunnerEvent,
    params::{ControlSpec, ParameterSet},
    qubit::{Gate, Qubit},
    render::{palette, Frame, SurfaceSize},
    scene::{CircuitStep, SceneState},
    types::{FrameCount, LogicalTime},
};

pub const QUBIT_COUNT: usize = 3;

const TARGET: &str = "target_qubit";

const GATE_X: &str = "gate_x";
const GATE_Y: &str = "gate_y";
const GATE_Z: &str = "gate_z";
const GATE_H: &str = "gate_h";
const MEASURE: &str = "measure";
const RESET_CIRCUIT: &str = "reset_circuit";

const LOG_LINES: usize = 6;

/// Three independent qubits, single-qubit gates and measurement, with a
/// running log of the circuit built so far.
pub struct QubitCircuit;

impl QubitCircuit {
    fn gate_for(action: &str) -> Option<Gate> {
        match action {
            GATE_X => Some(Gate::X),
            GATE_Y => Some(Gate::Y),
            GATE_Z => Some(Gate::Z),
            GATE_H => Some(Gate::H),
            _ => None,
        }
    }

    fn ensure_register(scene: &mut SceneState) {
        if scene.qubits.len() < QUBIT_COUNT {
            scene.qubits.resize(QUBIT_COUNT, Qubit::zero());
        }
    }
}

impl Concept for QubitCircuit {
    fn id(&self) -> ConceptId { ConceptId::QubitCircuit }
    fn title(&self) -> &'static str { "Quantum Computing" }
    fn description(&self) -> &'static str { "Qubits and quantum gates" }

    fn controls(&self) -> Vec<ControlSpec> {
        vec![ControlSpec::slider(TARGET, "Target qubit", 0.0, (QUBIT_COUNT - 1) as f64, 1.0, 0.0)]
    }

    fn actions(&self) -> Vec<ActionSpec> {
        vec![
            ActionSpec::new(GATE_X, "X gate"),
            ActionSpec::new(GATE_Y, "Y gate"),
            ActionSpec::new(GATE_Z, "Z gate"),
            ActionSpec::new(GATE_H, "H gate"),
            ActionSpec::new(MEASURE, "Measure"),
            ActionSpec::new(RESET_CIRCUIT, "Reset circuit"),
        ]
    }

    fn trigger(
        &self,
        action: &str,
        frame: FrameCount,
        params: &ParameterSet,
        scene: &mut SceneState,
    ) -> VizResult<Reaction> {
        Self::ensure_register(scene);
        let qubit = (params.number(TARGET).max(0.0) as usize).min(QUBIT_COUNT - 1);

        if let Some(gate) = Self::gate_for(action) {
            scene.qubits[qubit].apply(gate);
            scene.circuit.push(CircuitStep::Gate { gate, qubit });
            return Ok(Reaction::none().with_event(RunnerEvent::GateApplied { frame, gate, qubit }));
        }

        match action {
            MEASURE => {
                // Basis states have nothing to collapse.
                if scene.qubits[qubit].is_basis() {
                    return Ok(Reaction::none());
                }
                let draw = scene.rng().next_f64();
                let one = scene.qubits[qubit].measure(draw);
                scene.circuit.push(CircuitStep::Measure { qubit, one });
                scene.counters.measurements += 1;
                Ok(Reaction::none().with_event(RunnerEvent::QubitMeasured { frame, qubit, one }))
            }
            RESET_CIRCUIT => {
                scene.qubits.iter_mut().for_each(|q| *q = Qubit::zero());
                scene.circuit.clear();
                Ok(Reaction::none())
            }
            other => Err(VizError::UnknownAction { name: other.into() }),
        }
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
        let column = width / QUBIT_COUNT as f64;
        let target = params.number(TARGET) as usize;

        for index in 0..QUBIT_COUNT {
            let qubit = scene.qubits.get(index).copied().unwrap_or_default();
            let x0 = index as f64 * column + 10.0;
            let bar_w = column - 60.0;
            let title_color = if index == target { palette::CYAN } else { palette::LABEL };
            let ket_color = if qubit.p_one() < 1e-9 {
                palette::BLUE
            } else if qubit.p_zero() < 1e-9 {
                palette::RED
            } else {
                palette::VIOLET
            };

            frame.text((x0, 20.0), format!("Qubit {index}"), title_color, 14.0);
            frame.text((x0, 60.0), qubit.label(), ket_color, 24.0);

            for (row, (ket, p, color)) in [("|0⟩", qubit.p_zero(), palette::BLUE), ("|1⟩", qubit.p_one(), palette::RED)]
                .into_iter()
                .enumerate()
            {
                let y = 85.0 + row as f64 * 20.0;
                frame.text((x0, y + 8.0), ket, color, 12.0);
                frame.rect(x0 + 25.0, y, bar_w, 8.0, palette::GRID);
                frame.rect(x0 + 25.0, y, bar_w * p, 8.0, color);
                frame.text((x0 + 30.0 + bar_w, y + 8.0), format!("{:.0}%", p * 100.0), palette::MUTED, 10.0);
            }
        }

        let log_top = height - 20.0 - LOG_LINES as f64 * 16.0;
        frame.text((10.0, log_top - 8.0), "Quantum Circuit", palette::VIOLET, 14.0);
        if scene.circuit.is_empty() {
            frame.text((10.0, log_top + 12.0), "No operations performed yet", palette::MUTED, 12.0);
        }
        let skip = scene.circuit.len().saturating_sub(LOG_LINES);
        for (line, step) in scene.circuit.iter().enumerate().skip(skip) {
            let y = log_top + 12.0 + (line - skip) as f64 * 16.0;
            frame.text((10.0, y), format!("{}. {}", line + 1, step.describe()), palette::LABEL, 12.0);
        }
        frame
    }
}
