//! Single-qubit state vectors and the gates the circuit concept offers.
//!
//! A qubit is α|0⟩ + β|1⟩ with |α|² + |β|² = 1. Gates are the usual
//! 2×2 unitaries; measurement collapses onto a basis state.

use num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_1_SQRT_2;
use std::fmt;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    X,
    Y,
    Z,
    H,
}

impl Gate {
    pub const ALL: [Gate; 4] = [Self::X, Self::Y, Self::Z, Self::H];

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::H => "H",
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Qubit {
    pub alpha: Complex<f64>,
    pub beta:  Complex<f64>,
}

impl Default for Qubit {
    fn default() -> Self { Self::zero() }
}

impl Qubit {
    pub fn zero() -> Self {
        Self { alpha: Complex::new(1.0, 0.0), beta: Complex::new(0.0, 0.0) }
    }

    pub fn one() -> Self {
        Self { alpha: Complex::new(0.0, 0.0), beta: Complex::new(1.0, 0.0) }
    }

    pub fn apply(&mut self, gate: Gate) {
        let (a, b) = (self.alpha, self.beta);
        let i: Complex<f64> = Complex::i();
        let (alpha, beta) = match gate {
            Gate::X => (b, a),
            Gate::Y => (-i * b, i * a),
            Gate::Z => (a, -b),
            Gate::H => ((a + b) * FRAC_1_SQRT_2, (a - b) * FRAC_1_SQRT_2),
        };
        self.alpha = alpha;
        self.beta = beta;
    }

    /// Probability of reading |0⟩.
    pub fn p_zero(&self) -> f64 {
        self.alpha.norm_sqr()
    }

    pub fn p_one(&self) -> f64 {
        self.beta.norm_sqr()
    }

    /// True when a measurement outcome is already certain.
    pub fn is_basis(&self) -> bool {
        self.p_zero() < EPSILON || self.p_one() < EPSILON
    }

    /// Collapse given a uniform draw in [0, 1). Returns true for |1⟩.
    pub fn measure(&mut self, draw: f64) -> bool {
        let one = draw >= self.p_zero();
        *self = if one { Self::one() } else { Self::zero() };
        one
    }

    /// Relative phase of β with respect to α, in [0, 2π).
    pub fn relative_phase(&self) -> f64 {
        if self.is_basis() {
            return 0.0;
        }
        (self.beta.arg() - self.alpha.arg()).rem_euclid(std::f64::consts::TAU)
    }

    /// Short ket label for display: |0⟩, |1⟩, |+⟩, |−⟩, |+i⟩, |−i⟩, or
    /// the amplitudes when the state is none of those.
    pub fn label(&self) -> String {
        if self.p_one() < EPSILON {
            return "|0⟩".into();
        }
        if self.p_zero() < EPSILON {
            return "|1⟩".into();
        }
        if (self.p_zero() - 0.5).abs() < EPSILON {
            let phase = self.relative_phase();
            let named = [
                (0.0, "|+⟩"),
                (std::f64::consts::FRAC_PI_2, "|+i⟩"),
                (std::f64::consts::PI, "|−⟩"),
                (3.0 * std::f64::consts::FRAC_PI_2, "|−i⟩"),
                (std::f64::consts::TAU, "|+⟩"),
            ];
            if let Some((_, label)) = named.iter().find(|(p, _)| (phase - p).abs() < 1e-6) {
                return (*label).into();
            }
        }
        format!("{:.2}|0⟩ + {:.2}|1⟩", self.alpha.norm(), self.beta.norm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn x_flips_and_h_balances() {
        let mut q = Qubit::zero();
        q.apply(Gate::X);
        assert_eq!(q.label(), "|1⟩");
        q.apply(Gate::X);
        q.apply(Gate::H);
        assert_eq!(q.label(), "|+⟩");
        assert!((q.p_zero() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn z_on_plus_gives_minus_and_h_undoes_it() {
        let mut q = Qubit::zero();
        q.apply(Gate::H);
        q.apply(Gate::Z);
        assert_eq!(q.label(), "|−⟩");
        q.apply(Gate::H);
        assert_eq!(q.label(), "|1⟩");
    }

    #[test]
    fn z_leaves_zero_alone() {
        let mut q = Qubit::zero();
        q.apply(Gate::Z);
        assert_eq!(q, Qubit::zero());
    }

    #[test]
    fn measurement_collapses() {
        let mut q = Qubit::zero();
        q.apply(Gate::H);
        assert!(!q.measure(0.2));
        assert_eq!(q, Qubit::zero());

        let mut q = Qubit::zero();
        q.apply(Gate::H);
        assert!(q.measure(0.7));
        assert!(q.is_basis());
        assert_eq!(q.label(), "|1⟩");
    }
}
