//! Core traits for classifiers and feature reducers.
//!
//! These traits define the API contracts shared by every model.

use std::fmt::Debug;

use crate::data::{Label, Tuple};
use crate::error::Result;

/// A supervised classifier over labeled rows.
///
/// # Examples
///
/// ```
/// use lernen::prelude::*;
///
/// let train = vec![
///     Tuple::from_ints(&[10, 10], Feature::from("A")),
///     Tuple::from_ints(&[-10, -10], Feature::from("B")),
/// ];
///
/// let mut model = LogisticRegression::new()
///     .with_optimizer(GradientDescent::new(200, 1e-3, 1e-6));
/// model.train(&train).expect("non-empty training data");
///
/// let (labels, confidences) = model
///     .classify(&[Tuple::from_ints(&[9, 9], Feature::Missing)])
///     .expect("trained model");
/// assert_eq!(labels[0], Feature::from("A"));
/// assert!(confidences[0] > 0.5);
/// ```
pub trait Classifier {
    /// Fits the model to labeled rows, replacing any earlier fit.
    ///
    /// # Errors
    ///
    /// Returns an error for empty, ragged, or non-numeric training data.
    fn train(&mut self, rows: &[Tuple]) -> Result<()>;

    /// Predicts a label for every row together with a confidence score.
    ///
    /// Confidences are only meaningful relative to one another within a
    /// single classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not trained or rows have the wrong
    /// width.
    fn classify(&self, rows: &[Tuple]) -> Result<(Vec<Label>, Vec<f64>)>;
}

/// Reduces the feature set of rows, usually after a statistical analysis
/// of a training set.
///
/// `init` runs once against training data; `reduce` is read-only and may be
/// called from many threads afterwards. Implementors must be `Clone`;
/// models fit a copy during training.
pub trait Reducer: ReducerClone + Debug + Send + Sync {
    /// Fits the reducer to training rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows cannot be analyzed.
    fn init(&mut self, rows: &[Tuple]) -> Result<()>;

    /// Projects rows onto the retained features. Labels are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if a row is too narrow for the retained features.
    fn reduce(&self, rows: &[Tuple]) -> Result<Vec<Tuple>>;
}

/// Object-safe cloning for boxed reducers.
///
/// Implemented for every `Reducer + Clone`; there is no need to implement it
/// by hand.
pub trait ReducerClone {
    /// Clones `self` into a new box.
    fn clone_box(&self) -> Box<dyn Reducer>;
}

impl<T: Reducer + Clone + 'static> ReducerClone for T {
    fn clone_box(&self) -> Box<dyn Reducer> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Reducer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
