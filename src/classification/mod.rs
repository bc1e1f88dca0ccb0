//! Classification algorithms.
//!
//! This module implements multinomial logistic regression: one linear model
//! per class, trained by minimizing the L2-regularized negative
//! log-likelihood of a soft-max over the class activations.
//!
//! # Example
//!
//! ```
//! use lernen::prelude::*;
//!
//! let train = vec![
//!     Tuple::from_ints(&[10, 10], Feature::from("A")),
//!     Tuple::from_ints(&[9, 9], Feature::from("A")),
//!     Tuple::from_ints(&[11, 11], Feature::from("A")),
//!     Tuple::from_ints(&[-10, -10], Feature::from("B")),
//!     Tuple::from_ints(&[-9, -9], Feature::from("B")),
//!     Tuple::from_ints(&[-11, -11], Feature::from("B")),
//! ];
//!
//! let mut model = LogisticRegression::new()
//!     .with_optimizer(StochasticGradientDescent::default().with_random_state(42));
//! model.train(&train).expect("numeric training data");
//!
//! let (labels, confidences) = model
//!     .classify(&[
//!         Tuple::from_ints(&[8, 8], Feature::Missing),
//!         Tuple::from_ints(&[-8, -8], Feature::Missing),
//!     ])
//!     .expect("trained model");
//! assert_eq!(labels, vec![Feature::from("A"), Feature::from("B")]);
//! assert!(confidences.iter().all(|&c| c >= 0.9));
//! ```

use serde::{Deserialize, Serialize};

use crate::data::{feature_count, index_labels, numeric_row, to_numeric_rows, Label, Tuple};
use crate::error::{LernenError, Result};
use crate::feature_selection::NoReducer;
use crate::optim::{check_finite, Optimizer, StochasticGradientDescent};
use crate::traits::{Classifier, Reducer};

/// Numerically stable `ln Σ exp(aᵢ)`.
///
/// The largest activation is subtracted before exponentiating, so large
/// activations do not overflow. Returns negative infinity for an empty
/// slice.
///
/// # Example
///
/// ```
/// use lernen::classification::log_sum_exp;
///
/// let lse = log_sum_exp(&[1000.0, 1000.0]);
/// assert!((lse - (1000.0 + 2f64.ln())).abs() < 1e-9);
/// ```
#[must_use]
pub fn log_sum_exp(activations: &[f64]) -> f64 {
    let max = activations
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f64 = activations.iter().map(|a| (a - max).exp()).sum();
    max + sum.ln()
}

/// Soft-max probabilities of `activations`, computed through
/// [`log_sum_exp`].
#[must_use]
pub fn softmax(activations: &[f64]) -> Vec<f64> {
    let lse = log_sum_exp(activations);
    activations.iter().map(|a| (a - lse).exp()).collect()
}

/// Index and value of the largest element. The first maximum wins ties.
///
/// An empty slice yields `(0, f64::NEG_INFINITY)`.
#[must_use]
pub fn argmax(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| {
            if v > best.1 {
                (i, v)
            } else {
                best
            }
        })
}

/// `b + w·x`
fn activation(intercept: f64, weights: &[f64], x: &[f64]) -> f64 {
    intercept + weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>()
}

/// Objective and gradient over a fixed training set.
///
/// Parameters are packed as all intercepts first, then one weight block of
/// `num_features` per class, in label-vocabulary order.
struct NegLogLikelihood<'a> {
    data: &'a [Vec<f64>],
    class_ids: &'a [usize],
    num_classes: usize,
    num_features: usize,
    l2_penalty: f64,
}

impl NegLogLikelihood<'_> {
    fn num_params(&self) -> usize {
        self.num_classes * (self.num_features + 1)
    }

    fn activations(&self, params: &[f64], x: &[f64], out: &mut [f64]) {
        let (intercepts, weights) = params.split_at(self.num_classes);
        for (c, slot) in out.iter_mut().enumerate() {
            let block = &weights[c * self.num_features..(c + 1) * self.num_features];
            *slot = activation(intercepts[c], block, x);
        }
    }

    fn objective(&self, params: &[f64]) -> f64 {
        let mut activations = vec![0.0; self.num_classes];
        let mut nll = 0.0;

        for (x, &class) in self.data.iter().zip(self.class_ids) {
            self.activations(params, x, &mut activations);
            nll -= activations[class] - log_sum_exp(&activations);
        }

        let penalty = params.iter().map(|p| p * p).sum::<f64>();
        nll + 0.5 * self.l2_penalty * penalty
    }

    fn gradient(&self, params: &[f64], rows: impl Iterator<Item = usize>) -> Vec<f64> {
        let k = self.num_classes;
        let nf = self.num_features;
        let mut grad: Vec<f64> = params.iter().map(|p| self.l2_penalty * p).collect();
        let mut activations = vec![0.0; k];

        for i in rows {
            let x = &self.data[i];
            self.activations(params, x, &mut activations);
            let lse = log_sum_exp(&activations);

            for (c, &a) in activations.iter().enumerate() {
                let target = if c == self.class_ids[i] { 1.0 } else { 0.0 };
                let error = (a - lse).exp() - target;

                grad[c] += error;
                let block = &mut grad[k + c * nf..k + (c + 1) * nf];
                for (g, v) in block.iter_mut().zip(x) {
                    *g += error * v;
                }
            }
        }

        grad
    }
}

/// Plain-data configuration for [`LogisticRegression`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticRegressionConfig {
    /// L2 regularization strength; negative selects the default, zero
    /// disables regularization
    pub l2_penalty: f64,
}

impl Default for LogisticRegressionConfig {
    fn default() -> Self {
        Self {
            l2_penalty: LogisticRegression::DEFAULT_L2_PENALTY,
        }
    }
}

impl LogisticRegressionConfig {
    /// Parses a JSON object; omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LernenError::Config`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Multinomial logistic regression.
///
/// For a row `x`, the probability of class `c` is
///
/// ```text
/// P(c | x) = exp(W_c·x + b_c - logsumexp_j(W_j·x + b_j))
/// ```
///
/// Training minimizes
///
/// ```text
/// -Σᵢ ln P(yᵢ | xᵢ) + (λ/2)(‖W‖² + ‖b‖²)
/// ```
///
/// with the injected [`Optimizer`], in batch mode when the optimizer
/// supports it. Rows go through the injected [`Reducer`] (identity by
/// default) on the way into both `train` and `classify`.
///
/// Labels may be any [`Label`]; classes are numbered in the order their
/// labels first appear in the training set.
#[derive(Debug)]
pub struct LogisticRegression {
    reducer: Box<dyn Reducer>,
    optimizer: Box<dyn Optimizer>,
    l2_penalty: f64,
    labels: Vec<Label>,
    /// `[class][feature]`
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    num_features: usize,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    /// Default L2 regularization strength.
    pub const DEFAULT_L2_PENALTY: f64 = 1.0;

    /// Creates an untrained model with no reducer, a default
    /// [`StochasticGradientDescent`] and `λ = 1`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reducer: Box::new(NoReducer),
            optimizer: Box::new(StochasticGradientDescent::default()),
            l2_penalty: Self::DEFAULT_L2_PENALTY,
            labels: Vec::new(),
            weights: Vec::new(),
            intercepts: Vec::new(),
            num_features: 0,
        }
    }

    /// Sets the feature reducer applied before training and classification.
    #[must_use]
    pub fn with_reducer<R: Reducer + 'static>(mut self, reducer: R) -> Self {
        self.reducer = Box::new(reducer);
        self
    }

    /// Sets the optimizer used by `train`.
    #[must_use]
    pub fn with_optimizer<O: Optimizer + 'static>(mut self, optimizer: O) -> Self {
        self.optimizer = Box::new(optimizer);
        self
    }

    /// Sets the L2 regularization strength. Negative values select the
    /// default; zero disables regularization.
    #[must_use]
    pub fn with_l2_penalty(mut self, l2_penalty: f64) -> Self {
        self.l2_penalty = if l2_penalty < 0.0 {
            Self::DEFAULT_L2_PENALTY
        } else {
            l2_penalty
        };
        self
    }

    /// Builds an untrained model from configuration.
    ///
    /// # Errors
    ///
    /// Rejects a NaN or infinite penalty.
    pub fn from_config(config: &LogisticRegressionConfig) -> Result<Self> {
        check_finite("l2_penalty", config.l2_penalty)?;
        Ok(Self::new().with_l2_penalty(config.l2_penalty))
    }

    /// L2 regularization strength.
    #[must_use]
    pub fn l2_penalty(&self) -> f64 {
        self.l2_penalty
    }

    /// True once `train` has succeeded.
    #[must_use]
    pub fn is_trained(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Label vocabulary in class order.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Weight matrix, `[class][feature]`.
    #[must_use]
    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    /// One intercept per class.
    #[must_use]
    pub fn intercepts(&self) -> &[f64] {
        &self.intercepts
    }

    /// Number of features after reduction seen during training.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Per-class probabilities for every row, in [`Self::labels`] order.
    ///
    /// # Errors
    ///
    /// Returns [`LernenError::NotTrained`] before training,
    /// [`LernenError::DimensionMismatch`] for rows of the wrong width after
    /// reduction, and [`LernenError::NonNumericFeature`] for non-numeric
    /// values.
    pub fn predict_proba(&self, rows: &[Tuple]) -> Result<Vec<Vec<f64>>> {
        if !self.is_trained() {
            return Err(LernenError::not_trained("LogisticRegression"));
        }

        let reduced = self.reducer.reduce(rows)?;
        reduced
            .iter()
            .enumerate()
            .map(|(i, row)| {
                if row.len() != self.num_features {
                    return Err(LernenError::DimensionMismatch {
                        expected: format!("{} features", self.num_features),
                        actual: format!("{} features (row {i})", row.len()),
                    });
                }
                let x = numeric_row(row, i)?;
                Ok(self.probabilities(&x))
            })
            .collect()
    }

    fn probabilities(&self, x: &[f64]) -> Vec<f64> {
        let activations: Vec<f64> = self
            .intercepts
            .iter()
            .zip(&self.weights)
            .map(|(&b, w)| activation(b, w, x))
            .collect();
        softmax(&activations)
    }
}

impl Classifier for LogisticRegression {
    fn train(&mut self, rows: &[Tuple]) -> Result<()> {
        if rows.is_empty() {
            return Err(LernenError::empty_input(
                "logistic regression needs at least one training row",
            ));
        }

        // Fit a copy; nothing on `self` changes until every step succeeds.
        let mut reducer = self.reducer.clone();
        reducer.init(rows)?;
        let reduced = reducer.reduce(rows)?;
        let num_features = feature_count(&reduced)?;
        let data = to_numeric_rows(&reduced)?;
        let (labels, class_ids) = index_labels(&reduced);

        let problem = NegLogLikelihood {
            data: &data,
            class_ids: &class_ids,
            num_classes: labels.len(),
            num_features,
            l2_penalty: self.l2_penalty,
        };
        let initial = vec![0.0; problem.num_params()];
        let objective = |params: &[f64]| problem.objective(params);

        let params = if self.optimizer.supports_batch() {
            let points: Vec<usize> = (0..data.len()).collect();
            let gradient =
                |params: &[f64], batch: &[usize]| problem.gradient(params, batch.iter().copied());
            self.optimizer
                .optimize_batch(&initial, &points, &objective, &gradient)?
        } else {
            let gradient = |params: &[f64]| problem.gradient(params, 0..data.len());
            self.optimizer.optimize(&initial, &objective, &gradient)?
        };

        if params.len() != initial.len() {
            return Err(LernenError::dimension_mismatch(
                "optimized parameter count",
                initial.len(),
                params.len(),
            ));
        }

        let final_objective = problem.objective(&params);
        let (intercepts, weights) = params.split_at(labels.len());
        self.reducer = reducer;
        self.intercepts = intercepts.to_vec();
        self.weights = (0..labels.len())
            .map(|c| weights[c * num_features..(c + 1) * num_features].to_vec())
            .collect();
        self.num_features = num_features;
        self.labels = labels;

        tracing::info!(
            rows = data.len(),
            features = num_features,
            classes = self.labels.len(),
            objective = final_objective,
            "trained logistic regression"
        );
        Ok(())
    }

    fn classify(&self, rows: &[Tuple]) -> Result<(Vec<Label>, Vec<f64>)> {
        let probabilities = self.predict_proba(rows)?;
        Ok(probabilities
            .iter()
            .map(|p| {
                let (class, confidence) = argmax(p);
                (self.labels[class].clone(), confidence)
            })
            .unzip())
    }
}
