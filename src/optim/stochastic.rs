//! # Stochastic Gradient Strategy
//!
//! Draws one sample uniformly at random per step and descends along that
//! sample's squared-error gradient. Cheap per step (O(p)) but noisy.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::GradientStep;
use crate::dataset::Dataset;
use crate::Scalar;

/// Fixed learning rate for the stochastic strategy. The single-sample
/// gradient is noisy, so the rate stays an order of magnitude below the
/// precomputed-batch one.
pub(crate) const STEP_SIZE: Scalar = 1e-3;

/// Single-sample gradient strategy with an explicitly owned random source.
///
/// Owning the RNG (rather than sampling from process-wide state) makes runs
/// reproducible under a fixed seed.
pub struct StochasticGradient {
    rng: StdRng,
}

impl StochasticGradient {
    /// Creates the strategy, seeding the random source from `seed` when
    /// given, or from entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        StochasticGradient { rng }
    }

    /// Computes the gradient of the squared error for one uniformly drawn
    /// sample `i`: `x_i · (x_iᵗ·beta − y_i)`, unnormalized.
    pub fn compute_step(&mut self, beta: &Array1<Scalar>, dataset: &Dataset) -> GradientStep {
        let sample = self.rng.gen_range(0..dataset.n());
        let row = dataset.x().row(sample);
        let residual = row.dot(beta) - dataset.y()[sample];
        GradientStep {
            gradient: row.to_owned() * residual,
            samples_consumed: 1,
        }
    }
}
