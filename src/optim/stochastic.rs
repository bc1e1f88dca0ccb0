//! Stochastic gradient descent over shuffled mini-batches.
//!
//! Every iteration shuffles the full point list and sweeps it in consecutive
//! chunks of `batch_size`, so each point contributes to exactly one update
//! per iteration.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{check_finite, descend, BatchGradientFn, ObjectiveFn, Optimizer};

/// Plain-data configuration for [`StochasticGradientDescent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SgdConfig {
    /// Upper bound on full sweeps over the points
    pub max_iterations: usize,
    /// Step size
    pub learning_rate: f64,
    /// Early-stop threshold on the objective change between sweeps
    pub tolerance: f64,
    /// Points per gradient evaluation
    pub batch_size: usize,
    /// Seed for the shuffle; `None` seeds from entropy
    pub random_state: Option<u64>,
}

impl Default for SgdConfig {
    fn default() -> Self {
        Self {
            max_iterations: StochasticGradientDescent::DEFAULT_MAX_ITERATIONS,
            learning_rate: StochasticGradientDescent::DEFAULT_LEARNING_RATE,
            tolerance: StochasticGradientDescent::DEFAULT_TOLERANCE,
            batch_size: StochasticGradientDescent::DEFAULT_BATCH_SIZE,
            random_state: None,
        }
    }
}

impl SgdConfig {
    /// Parses a JSON object; omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LernenError::Config`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Mini-batch stochastic gradient descent.
///
/// # Algorithm
///
/// ```text
/// for iteration in 0..max_iterations:
///     shuffle(points)
///     for batch in chunks(points, batch_size):
///         θ = θ - η * ∇f(θ; batch)
///     stop if |f(θ) - f_prev| < tolerance   (not on the first sweep)
/// ```
///
/// Only batch mode is supported.
///
/// # Example
///
/// ```
/// use lernen::optim::{Optimizer, StochasticGradientDescent};
///
/// // Minimize Σ (θ - yᵢ)² over four points; the optimum is the mean.
/// let ys = [1.0, 2.0, 3.0, 4.0];
/// let objective = |p: &[f64]| ys.iter().map(|y| (p[0] - y).powi(2)).sum::<f64>();
/// let gradient = |p: &[f64], points: &[usize]| {
///     vec![points.iter().map(|&i| 2.0 * (p[0] - ys[i])).sum::<f64>()]
/// };
///
/// let mut sgd = StochasticGradientDescent::new(5000, 1e-3, 1e-12, 2).with_random_state(7);
/// let solution = sgd
///     .optimize_batch(&[0.0], &[0, 1, 2, 3], &objective, &gradient)
///     .expect("SGD supports batch mode");
/// assert!((solution[0] - 2.5).abs() < 0.25);
/// ```
#[derive(Debug, Clone)]
pub struct StochasticGradientDescent {
    max_iterations: usize,
    learning_rate: f64,
    tolerance: f64,
    batch_size: usize,
    random_state: Option<u64>,
    rng: StdRng,
}

impl Default for StochasticGradientDescent {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0, 0)
    }
}

impl StochasticGradientDescent {
    /// Default sweep cap.
    pub const DEFAULT_MAX_ITERATIONS: usize = 2000;
    /// Default step size.
    pub const DEFAULT_LEARNING_RATE: f64 = 1e-4;
    /// Default early-stop threshold.
    pub const DEFAULT_TOLERANCE: f64 = 1e-4;
    /// Default mini-batch size.
    pub const DEFAULT_BATCH_SIZE: usize = 128;

    /// Creates an SGD optimizer seeded from entropy.
    ///
    /// Zero or non-positive arguments select the default for that setting.
    #[must_use]
    pub fn new(
        max_iterations: usize,
        learning_rate: f64,
        tolerance: f64,
        batch_size: usize,
    ) -> Self {
        Self {
            max_iterations: if max_iterations == 0 {
                Self::DEFAULT_MAX_ITERATIONS
            } else {
                max_iterations
            },
            learning_rate: if learning_rate > 0.0 {
                learning_rate
            } else {
                Self::DEFAULT_LEARNING_RATE
            },
            tolerance: if tolerance > 0.0 {
                tolerance
            } else {
                Self::DEFAULT_TOLERANCE
            },
            batch_size: if batch_size == 0 {
                Self::DEFAULT_BATCH_SIZE
            } else {
                batch_size
            },
            random_state: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Sets the random seed for reproducible shuffling.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Builds an optimizer from configuration.
    ///
    /// # Errors
    ///
    /// Rejects NaN or infinite learning rates and tolerances.
    pub fn from_config(config: &SgdConfig) -> Result<Self> {
        check_finite("learning_rate", config.learning_rate)?;
        check_finite("tolerance", config.tolerance)?;
        let sgd = Self::new(
            config.max_iterations,
            config.learning_rate,
            config.tolerance,
            config.batch_size,
        );
        Ok(match config.random_state {
            Some(seed) => sgd.with_random_state(seed),
            None => sgd,
        })
    }

    /// Returns the sweep cap.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Returns the early-stop tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the mini-batch size.
    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Returns the configured seed, if any.
    #[must_use]
    pub fn random_state(&self) -> Option<u64> {
        self.random_state
    }
}

impl Optimizer for StochasticGradientDescent {
    fn supports_batch(&self) -> bool {
        true
    }

    fn optimize_batch(
        &mut self,
        initial_params: &[f64],
        points: &[usize],
        objective: &ObjectiveFn<'_>,
        gradient: &BatchGradientFn<'_>,
    ) -> Result<Vec<f64>> {
        let mut params = initial_params.to_vec();
        let mut points = points.to_vec();
        let mut previous: Option<f64> = None;

        for iteration in 0..self.max_iterations {
            points.shuffle(&mut self.rng);

            for batch in points.chunks(self.batch_size) {
                let grad = gradient(&params, batch);
                descend(&mut params, &grad, self.learning_rate)?;
            }

            let value = objective(&params);
            tracing::trace!(iteration, objective = value, "sgd sweep");

            if let Some(prev) = previous {
                if (value - prev).abs() < self.tolerance {
                    tracing::debug!(iteration, objective = value, "sgd converged");
                    return Ok(params);
                }
            }

            previous = Some(value);
        }

        tracing::debug!(
            iterations = self.max_iterations,
            objective = ?previous,
            "sgd reached iteration limit"
        );
        Ok(params)
    }
}
