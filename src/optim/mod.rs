//! Optimization algorithms for gradient-based learning.
//!
//! Every optimizer implements the [`Optimizer`] trait, which offers two entry
//! points:
//!
//! - [`Optimizer::optimize`] - full-dataset mode, driven by a plain gradient.
//! - [`Optimizer::optimize_batch`] - mini-batch mode, driven by a gradient
//!   evaluated over a subset of point indices.
//!
//! Callers check [`Optimizer::supports_batch`] to pick the entry point. Calling
//! an unsupported mode returns [`LernenError::UnsupportedMode`].
//!
//! # Available Optimizers
//!
//! - [`GradientDescent`] - full-batch gradient descent (non-batch mode only)
//! - [`StochasticGradientDescent`] - shuffled mini-batch sweeps (batch mode only)
//!
//! # Example
//!
//! ```
//! use lernen::optim::{GradientDescent, Optimizer};
//!
//! let mut optimizer = GradientDescent::new(5000, 0.1, 1e-12);
//!
//! let objective = |x: &[f64]| (x[0] - 5.0).powi(2) + (x[1] - 3.0).powi(2);
//! let gradient = |x: &[f64]| vec![2.0 * (x[0] - 5.0), 2.0 * (x[1] - 3.0)];
//!
//! let solution = optimizer
//!     .optimize(&[0.0, 0.0], &objective, &gradient)
//!     .expect("gradient descent supports non-batch mode");
//! assert!((solution[0] - 5.0).abs() < 1e-4);
//! assert!((solution[1] - 3.0).abs() < 1e-4);
//! ```

use std::fmt::Debug;

use crate::error::{LernenError, Result};

mod gradient_descent;
mod stochastic;

pub use gradient_descent::{GradientDescent, GradientDescentConfig};
pub use stochastic::{SgdConfig, StochasticGradientDescent};

/// The scalar objective to minimize.
pub type ObjectiveFn<'a> = dyn Fn(&[f64]) -> f64 + 'a;

/// Gradient of the objective with respect to every parameter.
pub type GradientFn<'a> = dyn Fn(&[f64]) -> Vec<f64> + 'a;

/// Gradient evaluated only over the points named by the index slice.
pub type BatchGradientFn<'a> = dyn Fn(&[f64], &[usize]) -> Vec<f64> + 'a;

/// Unified trait for iterative minimizers.
///
/// Optimizers never signal non-convergence: they return their best
/// parameters after `max_iterations` or after the tolerance check stops them.
/// Implementations must support at least one of the two modes.
pub trait Optimizer: Debug + Send + Sync {
    /// Whether [`Optimizer::optimize_batch`] is implemented.
    fn supports_batch(&self) -> bool;

    /// Full-dataset optimization.
    ///
    /// The caller's `initial_params` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LernenError::UnsupportedMode`] for batch-only optimizers and
    /// [`LernenError::DimensionMismatch`] if the gradient has the wrong length.
    fn optimize(
        &mut self,
        _initial_params: &[f64],
        _objective: &ObjectiveFn<'_>,
        _gradient: &GradientFn<'_>,
    ) -> Result<Vec<f64>> {
        Err(LernenError::unsupported_mode(
            std::any::type_name::<Self>(),
            "non-batch",
        ))
    }

    /// Mini-batch optimization over the identifiers in `points`.
    ///
    /// `points` usually holds one index per training row; it is chunked into
    /// batches and each batch is handed to `gradient`.
    ///
    /// # Errors
    ///
    /// Returns [`LernenError::UnsupportedMode`] for optimizers without batch
    /// support and [`LernenError::DimensionMismatch`] if the gradient has the
    /// wrong length.
    fn optimize_batch(
        &mut self,
        _initial_params: &[f64],
        _points: &[usize],
        _objective: &ObjectiveFn<'_>,
        _gradient: &BatchGradientFn<'_>,
    ) -> Result<Vec<f64>> {
        Err(LernenError::unsupported_mode(
            std::any::type_name::<Self>(),
            "batch",
        ))
    }
}

/// Applies `param -= learning_rate * gradient` to every parameter.
pub(crate) fn descend(params: &mut [f64], gradient: &[f64], learning_rate: f64) -> Result<()> {
    if gradient.len() != params.len() {
        return Err(LernenError::dimension_mismatch(
            "gradient length",
            params.len(),
            gradient.len(),
        ));
    }

    for (param, grad) in params.iter_mut().zip(gradient) {
        *param -= learning_rate * grad;
    }

    Ok(())
}

/// Rejects NaN and infinite hyperparameters coming from configuration.
pub(crate) fn check_finite(param: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LernenError::InvalidHyperparameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: "a finite number".to_string(),
        })
    }
}
