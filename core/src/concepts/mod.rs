//! Built-in concepts. Each file is one self-contained visualization:
//! its controls, its update step and its renderer.

mod double_slit;
mod entanglement;
mod orbitals;
mod qubit_circuit;
mod schrodinger_cat;
mod superposition;
mod tunneling;
mod uncertainty;
mod wave_equation;
mod wave_particle;

pub use double_slit::{fringe_intensity, DoubleSlit};
pub use entanglement::Entanglement;
pub use orbitals::{Orbital, Orbitals};
pub use qubit_circuit::{QubitCircuit, QUBIT_COUNT};
pub use schrodinger_cat::{decay_probability, SchrodingerCat};
pub use superposition::{up_probability, Superposition};
pub use tunneling::{transmission, Tunneling};
pub use uncertainty::{momentum_uncertainty, Uncertainty};
pub use wave_equation::{harmonic_potential, wave_function, WaveEquation};
pub use wave_particle::WaveParticle;
