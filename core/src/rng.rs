//! Deterministic answer stream for headless practice runs.
//!
//! RULE: nothing in the engine calls a platform RNG. Headless players
//! draw from an AnswerRng seeded from one master seed, so a replay with
//! the same seed produces the same answers.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct AnswerRng {
    inner: Pcg64Mcg,
}

impl AnswerRng {
    /// Stream for run number `run_index` under `master_seed`.
    /// Each run gets its own stream, so adding runs never shifts earlier ones.
    pub fn new(master_seed: u64, run_index: u64) -> Self {
        let derived_seed = master_seed ^ (run_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Whether a player with the given accuracy answers the next prompt correctly.
    pub fn answer(&mut self, accuracy: f64) -> bool {
        self.next_f64() < accuracy.clamp(0.0, 1.0)
    }
}
