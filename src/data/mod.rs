//! Tabular rows for supervised learning.
//!
//! A dataset is a slice of [`Tuple`]s. Each tuple holds an ordered list of
//! [`Feature`] values plus one label. Labels are themselves features so that
//! integers, strings and booleans can all act as class identifiers.
//!
//! # Example
//!
//! ```
//! use lernen::data::{Feature, Tuple};
//!
//! let row = Tuple::from_ints(&[10, 10], Feature::from("A"));
//! assert_eq!(row.len(), 2);
//! assert_eq!(row.numeric(1).expect("numeric column"), 10.0);
//! assert_eq!(row.label(), &Feature::from("A"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LernenError, Result};

/// A single feature (or label) value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Feature {
    /// Integral value
    Int(i64),
    /// Real value
    Float(f64),
    /// Boolean value, numerically 0 or 1
    Bool(bool),
    /// Categorical value
    String(String),
    /// Absent value
    Missing,
}

/// Class labels share the feature representation.
pub type Label = Feature;

/// Coarse type of a feature as seen by reducers and classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureType {
    /// Int or Float
    Numeric,
    /// Bool
    Boolean,
    /// String
    String,
}

impl Feature {
    /// Infers a feature from an untyped JSON value.
    ///
    /// # Errors
    ///
    /// Arrays and objects have no feature representation and yield
    /// [`LernenError::UnsupportedValue`].
    pub fn infer(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::Missing),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Self::Float(f))
                } else {
                    Err(LernenError::UnsupportedValue {
                        value: n.to_string(),
                    })
                }
            }
            Value::String(s) => Ok(Self::String(s.clone())),
            Value::Array(_) | Value::Object(_) => Err(LernenError::UnsupportedValue {
                value: value.to_string(),
            }),
        }
    }

    /// Numeric view of the value. Booleans map to 0/1; strings and missing
    /// values have none.
    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::String(_) | Self::Missing => None,
        }
    }

    /// True for Int and Float.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    /// True for [`Feature::Missing`].
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// The coarse type of this value, `None` when missing.
    #[must_use]
    pub fn feature_type(&self) -> Option<FeatureType> {
        match self {
            Self::Int(_) | Self::Float(_) => Some(FeatureType::Numeric),
            Self::Bool(_) => Some(FeatureType::Boolean),
            Self::String(_) => Some(FeatureType::String),
            Self::Missing => None,
        }
    }
}

// Floats compare by bit pattern so labels stay usable as map keys.
impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Missing, Self::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for Feature {}

impl Hash for Feature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Int(i) => i.hash(state),
            Self::Float(f) => f.to_bits().hash(state),
            Self::Bool(b) => b.hash(state),
            Self::String(s) => s.hash(state),
            Self::Missing => {}
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<i64> for Feature {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Feature {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Feature {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Feature {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Feature {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// One row of a dataset: ordered feature values and a label.
///
/// Rows fed to `classify` usually carry [`Feature::Missing`] as label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    features: Vec<Feature>,
    label: Label,
}

impl Tuple {
    /// Creates a row from feature values and a label.
    #[must_use]
    pub fn new(features: Vec<Feature>, label: Label) -> Self {
        Self { features, label }
    }

    /// Creates a row of `Float` features.
    #[must_use]
    pub fn from_numeric(values: &[f64], label: Label) -> Self {
        Self::new(values.iter().map(|&v| Feature::Float(v)).collect(), label)
    }

    /// Creates a row of `Int` features.
    #[must_use]
    pub fn from_ints(values: &[i64], label: Label) -> Self {
        Self::new(values.iter().map(|&v| Feature::Int(v)).collect(), label)
    }

    /// Creates a row by inferring every raw value.
    ///
    /// # Errors
    ///
    /// Fails on the first value [`Feature::infer`] rejects.
    pub fn from_json(values: &[Value], label: &Value) -> Result<Self> {
        let features = values.iter().map(Feature::infer).collect::<Result<Vec<_>>>()?;
        Ok(Self::new(features, Feature::infer(label)?))
    }

    /// Number of features (the label is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the row has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// All feature values.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// The feature at `index`, if any.
    #[must_use]
    pub fn feature(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// The row label.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Returns the same features under a new label.
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = label;
        self
    }

    /// Numeric value of feature `index`.
    ///
    /// # Errors
    ///
    /// Out-of-range indexes are a dimension mismatch; non-numeric values are
    /// [`LernenError::NonNumericValue`].
    pub fn numeric(&self, index: usize) -> Result<f64> {
        let feature = self
            .features
            .get(index)
            .ok_or_else(|| LernenError::dimension_mismatch("feature index <", self.len(), index))?;
        feature
            .numeric_value()
            .ok_or(LernenError::NonNumericValue { column: index })
    }

    /// Numeric view of the whole row.
    ///
    /// # Errors
    ///
    /// Returns [`LernenError::NonNumericValue`] for the first value without
    /// a numeric view.
    pub fn to_numeric(&self) -> Result<Vec<f64>> {
        self.features
            .iter()
            .enumerate()
            .map(|(column, f)| {
                f.numeric_value()
                    .ok_or(LernenError::NonNumericValue { column })
            })
            .collect()
    }
}

/// Checks that `rows` is non-empty and uniformly wide, returning the width.
///
/// # Errors
///
/// [`LernenError::EmptyInput`] for no rows, [`LernenError::DimensionMismatch`]
/// naming the first ragged row otherwise.
pub fn feature_count(rows: &[Tuple]) -> Result<usize> {
    let first = rows
        .first()
        .ok_or_else(|| LernenError::empty_input("dataset has no rows"))?;
    let width = first.len();

    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.len() != width {
            return Err(LernenError::DimensionMismatch {
                expected: format!("{width} features (row 0)"),
                actual: format!("{} features (row {i})", row.len()),
            });
        }
    }

    Ok(width)
}

/// Converts rows into a dense numeric matrix, one `Vec` per row.
///
/// # Errors
///
/// Propagates width and numeric-value failures, with the real row index.
pub fn to_numeric_rows(rows: &[Tuple]) -> Result<Vec<Vec<f64>>> {
    feature_count(rows)?;
    rows.iter()
        .enumerate()
        .map(|(i, row)| numeric_row(row, i))
        .collect()
}

/// [`Tuple::to_numeric`] with errors naming row `index`.
pub(crate) fn numeric_row(row: &Tuple, index: usize) -> Result<Vec<f64>> {
    row.to_numeric().map_err(|err| match err {
        LernenError::NonNumericValue { column } => LernenError::NonNumericFeature {
            row: index,
            column,
        },
        other => other,
    })
}

/// Splits rows into unlabeled copies and their labels.
#[must_use]
pub fn strip_labels(rows: &[Tuple]) -> (Vec<Tuple>, Vec<Label>) {
    rows.iter()
        .map(|row| {
            (
                Tuple::new(row.features.clone(), Feature::Missing),
                row.label.clone(),
            )
        })
        .unzip()
}

/// Builds the label vocabulary in first-seen order and maps every row to
/// its index in that vocabulary.
///
/// ```
/// use lernen::data::{index_labels, Feature, Tuple};
///
/// let rows = vec![
///     Tuple::from_ints(&[0], Feature::from("B")),
///     Tuple::from_ints(&[1], Feature::from("A")),
///     Tuple::from_ints(&[2], Feature::from("B")),
/// ];
/// let (labels, ids) = index_labels(&rows);
/// assert_eq!(labels, vec![Feature::from("B"), Feature::from("A")]);
/// assert_eq!(ids, vec![0, 1, 0]);
/// ```
#[must_use]
pub fn index_labels(rows: &[Tuple]) -> (Vec<Label>, Vec<usize>) {
    let mut labels: Vec<Label> = Vec::new();
    let mut lookup: HashMap<&Label, usize> = HashMap::new();

    let ids = rows
        .iter()
        .map(|row| {
            *lookup.entry(row.label()).or_insert_with(|| {
                labels.push(row.label().clone());
                labels.len() - 1
            })
        })
        .collect();

    (labels, ids)
}

/// Infers the type of every data column from one row, plus the label type.
///
/// A missing label is typed as [`FeatureType::String`].
///
/// # Errors
///
/// Missing data values cannot be typed and yield
/// [`LernenError::UnsupportedValue`].
pub fn infer_feature_types(row: &Tuple) -> Result<(Vec<FeatureType>, FeatureType)> {
    let types = row
        .features
        .iter()
        .map(|f| {
            f.feature_type().ok_or_else(|| LernenError::UnsupportedValue {
                value: f.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let label_type = row.label.feature_type().unwrap_or(FeatureType::String);
    Ok((types, label_type))
}
