//! Error types for lernen operations.
//!
//! Every precondition violation (empty training data, ragged rows, calling an
//! optimizer mode it does not implement, classifying before training) is
//! reported through [`LernenError`]. Degenerate numeric conditions such as a
//! zero-variance column are not errors.

use thiserror::Error;

/// Main error type for lernen operations.
///
/// # Examples
///
/// ```
/// use lernen::error::LernenError;
///
/// let err = LernenError::DimensionMismatch {
///     expected: "3 features".to_string(),
///     actual: "2 features".to_string(),
/// };
/// assert!(err.to_string().contains("dimension mismatch"));
/// ```
#[derive(Debug, Error)]
pub enum LernenError {
    /// An operation that needs at least one row received none.
    #[error("empty input: {context}")]
    EmptyInput {
        /// What was empty
        context: String,
    },

    /// Row widths disagree with each other or with a trained model.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description
        expected: String,
        /// Actual dimensions found
        actual: String,
    },

    /// A model was used before `train`.
    #[error("{model} is not trained; call train() first")]
    NotTrained {
        /// Model name
        model: String,
    },

    /// The optimizer does not implement the requested entry point.
    #[error("{optimizer} does not support {mode} optimization")]
    UnsupportedMode {
        /// Optimizer name
        optimizer: String,
        /// "batch" or "non-batch"
        mode: String,
    },

    /// A feature without a numeric value was found where one is required.
    #[error("feature {column} of row {row} is not numeric")]
    NonNumericFeature {
        /// Row index
        row: usize,
        /// Column index
        column: usize,
    },

    /// A single row's feature has no numeric value.
    #[error("feature {column} is not numeric")]
    NonNumericValue {
        /// Column index
        column: usize,
    },

    /// Feature inference was given a raw value it cannot represent.
    #[error("unsupported feature value: {value}")]
    UnsupportedValue {
        /// Rendering of the offending value
        value: String,
    },

    /// Invalid hyperparameter value provided.
    #[error("invalid hyperparameter: {param} = {value}, expected {constraint}")]
    InvalidHyperparameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl LernenError {
    /// Create a dimension mismatch error with descriptive context
    #[must_use]
    pub fn dimension_mismatch(context: &str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}={expected}"),
            actual: format!("{actual}"),
        }
    }

    /// Create an empty input error
    #[must_use]
    pub fn empty_input(context: &str) -> Self {
        Self::EmptyInput {
            context: context.to_string(),
        }
    }

    /// Create a not-trained error for the named model
    #[must_use]
    pub fn not_trained(model: &str) -> Self {
        Self::NotTrained {
            model: model.to_string(),
        }
    }

    /// Create an unsupported-mode error for the named optimizer
    #[must_use]
    pub fn unsupported_mode(optimizer: &str, mode: &str) -> Self {
        Self::UnsupportedMode {
            optimizer: optimizer.to_string(),
            mode: mode.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, LernenError>;
