//! Lernen: small supervised-learning toolkit for in-memory tabular data.
//!
//! Lernen provides multinomial logistic regression trained through a
//! pluggable optimizer, an equal-width discretizer, and max-relevance,
//! min-redundancy (mRMR) feature selection.
//!
//! # Quick Start
//!
//! ```
//! use lernen::prelude::*;
//!
//! let train = vec![
//!     Tuple::from_ints(&[10, 10], Feature::from("A")),
//!     Tuple::from_ints(&[9, 9], Feature::from("A")),
//!     Tuple::from_ints(&[-10, -10], Feature::from("B")),
//!     Tuple::from_ints(&[-9, -9], Feature::from("B")),
//! ];
//!
//! let mut model = LogisticRegression::new()
//!     .with_optimizer(GradientDescent::default());
//! model.train(&train).expect("numeric training data");
//!
//! let (labels, _) = model
//!     .classify(&[Tuple::from_ints(&[8, 8], Feature::Missing)])
//!     .expect("trained model");
//! assert_eq!(labels[0], Feature::from("A"));
//! ```
//!
//! # Modules
//!
//! - [`data`]: Feature values, rows and dataset helpers
//! - [`optim`]: Optimization algorithms (gradient descent, mini-batch SGD)
//! - [`classification`]: Classification algorithms (Logistic Regression)
//! - [`preprocessing`]: Equal-width discretization
//! - [`feature_selection`]: Feature reducers (mRMR, manual, identity)
//! - [`traits`]: `Classifier` and `Reducer` contracts
//! - [`error`]: Error type shared by every module

pub mod classification;
pub mod data;
pub mod error;
pub mod feature_selection;
pub mod optim;
pub mod prelude;
pub mod preprocessing;
pub mod traits;

pub use error::{LernenError, Result};
pub use traits::{Classifier, Reducer};
