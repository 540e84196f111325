//! Deterministic random number generation for scene updates.
//!
//! RULE: Nothing in a concept's advance step may call a platform RNG.
//! All randomness flows through the SceneRng owned by the runner's
//! scene state, seeded from (master_seed XOR concept slot).
//! This means:
//!   - Two runners for the same concept and seed replay identically.
//!   - Reset restores the stream to its first draw.

use crate::concept::ConceptId;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

#[derive(Debug, Clone)]
pub struct SceneRng {
    pub name: &'static str,
    seed:  u64,
    inner: Pcg64Mcg,
}

impl SceneRng {
    /// Create a scene RNG from the master seed and a stable slot index.
    /// The index must never change once assigned.
    pub fn new(master_seed: u64, slot_index: u64) -> Self {
        let seed = master_seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            seed,
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    pub fn for_concept(master_seed: u64, concept: ConceptId) -> Self {
        Self::new(master_seed, concept.slot()).with_name(concept.as_str())
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Rewind the stream to its first draw.
    pub fn restart(&mut self) {
        self.inner = Pcg64Mcg::seed_from_u64(self.seed);
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Fair coin.
    pub fn coin(&mut self) -> bool {
        self.chance(0.5)
    }

    /// Normal sample via Box–Muller.
    pub fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-12);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + z * std_dev
    }
}
