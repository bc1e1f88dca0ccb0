//! Preprocessing transforms applied before information-theoretic analysis.
//!
//! The discretizer maps every numeric column, independently, onto
//! `num_buckets` equal-width integer buckets `0..num_buckets`. Columns are
//! scaled on their own range, so a percentage column and a count column can
//! sit side by side without sharing bucket boundaries.
//!
//! # Example
//!
//! ```
//! use lernen::data::{Feature, Tuple};
//! use lernen::preprocessing::discretize_features;
//!
//! let rows = vec![
//!     Tuple::from_ints(&[1, 10], Feature::from("A")),
//!     Tuple::from_ints(&[3, 30], Feature::from("A")),
//!     Tuple::from_ints(&[5, 50], Feature::from("B")),
//! ];
//!
//! let discrete = discretize_features(&rows, 2);
//! assert_eq!(discrete[0].features(), &[Feature::Int(0), Feature::Int(0)]);
//! assert_eq!(discrete[1].features(), &[Feature::Int(1), Feature::Int(1)]);
//! assert_eq!(discrete[2].features(), &[Feature::Int(1), Feature::Int(1)]);
//! assert_eq!(discrete[2].label(), &Feature::from("B"));
//! ```

use crate::data::{Feature, Tuple};

/// Maps one value onto a bucket in `0..num_buckets`.
///
/// Values below `min` land in bucket 0 and values at or above `max` in the
/// last bucket. A zero-width range puts everything in bucket 0, and so does
/// `num_buckets <= 1`.
#[must_use]
pub fn discretize_value(value: f64, min: f64, max: f64, num_buckets: usize) -> usize {
    if max == min || num_buckets <= 1 {
        return 0;
    }

    let bucket_width = (max - min) / num_buckets as f64;
    let bucket = ((value - min).max(0.0) / bucket_width).floor();

    // Saturating float-to-int cast also absorbs NaN (-> 0).
    (bucket as usize).min(num_buckets - 1)
}

/// Discretizes the numeric values of a single row against fixed bounds.
///
/// Non-numeric values are left untouched. Returns the row unchanged when
/// `num_buckets < 1` or `min > max`.
#[must_use]
pub fn discretize_with_bounds(row: &Tuple, min: f64, max: f64, num_buckets: i32) -> Tuple {
    if num_buckets < 1 || min > max {
        return row.clone();
    }

    let features = row
        .features()
        .iter()
        .map(|feature| {
            if let Some(value) = feature.numeric_value().filter(|_| feature.is_numeric()) {
                Feature::Int(discretize_value(value, min, max, num_buckets as usize) as i64)
            } else {
                feature.clone()
            }
        })
        .collect();

    Tuple::new(features, row.label().clone())
}

/// Discretizes every numeric column of `rows` on its own `[min, max]` range.
///
/// Numeric columns (judged by the first row) become `Feature::Int` buckets;
/// other columns pass through. Labels are preserved. When `num_buckets <= 0`
/// or `rows` is empty the input is returned unchanged.
#[must_use]
pub fn discretize_features(rows: &[Tuple], num_buckets: i32) -> Vec<Tuple> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    if num_buckets <= 0 {
        return rows.to_vec();
    }
    let num_buckets = num_buckets as usize;

    let mut features: Vec<Vec<Feature>> = rows.iter().map(|r| r.features().to_vec()).collect();

    for column in 0..first.len() {
        if !first.feature(column).is_some_and(Feature::is_numeric) {
            continue;
        }

        let values: Vec<Option<f64>> = rows
            .iter()
            .map(|r| r.feature(column).and_then(Feature::numeric_value))
            .collect();
        let Some((min, max)) = column_bounds(values.iter().flatten().copied()) else {
            continue;
        };

        for (row_features, value) in features.iter_mut().zip(&values) {
            if let Some(value) = value {
                row_features[column] =
                    Feature::Int(discretize_value(*value, min, max, num_buckets) as i64);
            }
        }
    }

    features
        .into_iter()
        .zip(rows)
        .map(|(f, row)| Tuple::new(f, row.label().clone()))
        .collect()
}

/// Discretizes a dense numeric matrix column by column.
///
/// Returns all-zero rows when `num_buckets == 0`. All rows must share the
/// width of the first row.
#[must_use]
pub fn discretize_columns(rows: &[Vec<f64>], num_buckets: usize) -> Vec<Vec<usize>> {
    let width = rows.first().map_or(0, Vec::len);
    let mut discrete = vec![vec![0usize; width]; rows.len()];
    if num_buckets == 0 {
        return discrete;
    }

    for column in 0..width {
        let Some((min, max)) = column_bounds(rows.iter().map(|r| r[column])) else {
            continue;
        };
        for (out, row) in discrete.iter_mut().zip(rows) {
            out[column] = discretize_value(row[column], min, max, num_buckets);
        }
    }

    discrete
}

fn column_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |bounds, v| match bounds {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}
