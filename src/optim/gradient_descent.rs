//! Full-batch gradient descent.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{check_finite, descend, GradientFn, ObjectiveFn, Optimizer};

/// Plain-data configuration for [`GradientDescent`].
///
/// # Example
///
/// ```
/// use lernen::optim::GradientDescentConfig;
///
/// let config = GradientDescentConfig::from_json(r#"{"learning_rate": 0.01}"#)
///     .expect("valid config");
/// assert_eq!(config.max_iterations, 1000);
/// assert!((config.learning_rate - 0.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientDescentConfig {
    /// Upper bound on update steps
    pub max_iterations: usize,
    /// Step size
    pub learning_rate: f64,
    /// Early-stop threshold on the objective change between steps
    pub tolerance: f64,
}

impl Default for GradientDescentConfig {
    fn default() -> Self {
        Self {
            max_iterations: GradientDescent::DEFAULT_MAX_ITERATIONS,
            learning_rate: GradientDescent::DEFAULT_LEARNING_RATE,
            tolerance: GradientDescent::DEFAULT_TOLERANCE,
        }
    }
}

impl GradientDescentConfig {
    /// Parses a JSON object; omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LernenError::Config`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Gradient descent over the whole dataset.
///
/// # Update Rule
///
/// `θ = θ - η * ∇f(θ)`, repeated until `|f(θ') - f(θ)| < tolerance` or
/// `max_iterations` steps have been taken.
///
/// Deterministic for deterministic objective and gradient. Does not support
/// batch mode.
///
/// # Example
///
/// ```
/// use lernen::optim::{GradientDescent, Optimizer};
///
/// let mut gd = GradientDescent::default();
/// assert!(!gd.supports_batch());
///
/// let objective = |x: &[f64]| x[0] * x[0];
/// let batch_gradient = |x: &[f64], _points: &[usize]| vec![2.0 * x[0]];
/// assert!(gd.optimize_batch(&[1.0], &[0], &objective, &batch_gradient).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientDescent {
    max_iterations: usize,
    learning_rate: f64,
    tolerance: f64,
}

impl Default for GradientDescent {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0)
    }
}

impl GradientDescent {
    /// Default iteration cap.
    pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
    /// Default step size.
    pub const DEFAULT_LEARNING_RATE: f64 = 1e-4;
    /// Default early-stop threshold.
    pub const DEFAULT_TOLERANCE: f64 = 1e-4;

    /// Creates a gradient descent optimizer.
    ///
    /// A zero `max_iterations` or a non-positive `learning_rate` or
    /// `tolerance` selects the default for that setting.
    #[must_use]
    pub fn new(max_iterations: usize, learning_rate: f64, tolerance: f64) -> Self {
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
        }
    }

    /// Builds an optimizer from configuration.
    ///
    /// # Errors
    ///
    /// Rejects NaN or infinite learning rates and tolerances.
    pub fn from_config(config: &GradientDescentConfig) -> Result<Self> {
        check_finite("learning_rate", config.learning_rate)?;
        check_finite("tolerance", config.tolerance)?;
        Ok(Self::new(
            config.max_iterations,
            config.learning_rate,
            config.tolerance,
        ))
    }

    /// Returns the iteration cap.
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
}

impl Optimizer for GradientDescent {
    fn supports_batch(&self) -> bool {
        false
    }

    fn optimize(
        &mut self,
        initial_params: &[f64],
        objective: &ObjectiveFn<'_>,
        gradient: &GradientFn<'_>,
    ) -> Result<Vec<f64>> {
        let mut params = initial_params.to_vec();
        let mut value = objective(&params);

        for iteration in 0..self.max_iterations {
            let grad = gradient(&params);
            descend(&mut params, &grad, self.learning_rate)?;

            let next_value = objective(&params);
            tracing::trace!(iteration, objective = next_value, "gradient descent step");

            if (next_value - value).abs() < self.tolerance {
                tracing::debug!(
                    iteration,
                    objective = next_value,
                    "gradient descent converged"
                );
                return Ok(params);
            }

            value = next_value;
        }

        tracing::debug!(
            iterations = self.max_iterations,
            objective = value,
            "gradient descent reached iteration limit"
        );
        Ok(params)
    }
}
