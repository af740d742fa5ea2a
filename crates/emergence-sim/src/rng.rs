//! Seeded random-generation context.
//!
//! One `SimRng` is owned by the grid and threaded through topology
//! construction and every cell update. Nothing in this crate touches
//! process-global RNG state, so identical seeds give identical runs.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;

pub struct SimRng {
    inner: ChaCha12Rng,
}

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha12Rng::seed_from_u64(seed),
        }
    }

    /// Uniform draw in [0, 1).
    pub fn unit(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform draw in [lo, hi).
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.unit()
    }

    /// Uniform index in 0..n. `n` must be nonzero.
    pub fn index(&mut self, n: usize) -> usize {
        self.inner.random_range(0..n)
    }

    /// Bernoulli trial with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Gaussian draw via the Box-Muller transform (avoids a rand_distr
    /// dependency).
    pub fn gaussian(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = self.unit().max(f64::EPSILON);
        let u2 = self.unit();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + sd * z
    }
}
