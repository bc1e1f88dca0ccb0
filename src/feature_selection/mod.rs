//! Feature reducers.
//!
//! A [`Reducer`] is fitted once on training rows and then projects any
//! number of row sets onto the features it retained.
//!
//! - [`NoReducer`] - keeps every feature
//! - [`ManualReducer`] - keeps a fixed list of columns
//! - [`MrmrReducer`] - greedy max-relevance, min-redundancy selection over
//!   discretized mutual information (Peng, Long & Ding, 2005)
//!
//! # Example
//!
//! ```
//! use lernen::prelude::*;
//!
//! let rows = vec![
//!     Tuple::from_ints(&[1, 10, 100], Feature::from("A")),
//!     Tuple::from_ints(&[2, 20, 200], Feature::from("B")),
//! ];
//!
//! let reducer = ManualReducer::new(vec![2, 0]);
//! let reduced = reducer.reduce(&rows).expect("columns in range");
//! assert_eq!(reduced[1].features(), &[Feature::Int(200), Feature::Int(2)]);
//! assert_eq!(reduced[1].label(), &Feature::from("B"));
//! ```

use serde::{Deserialize, Serialize};

use crate::data::Tuple;
use crate::error::{LernenError, Result};
use crate::traits::Reducer;

mod mrmr;
mod tables;

pub use mrmr::{MrmrConfig, MrmrReducer};
pub use tables::ProbabilityTables;

/// Projects every row onto `columns`, in the given order, keeping labels.
///
/// # Errors
///
/// Returns [`LernenError::DimensionMismatch`] if a column index is out of
/// range for some row.
pub fn select_features(rows: &[Tuple], columns: &[usize]) -> Result<Vec<Tuple>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let features = columns
                .iter()
                .map(|&column| {
                    row.feature(column).cloned().ok_or_else(|| {
                        LernenError::DimensionMismatch {
                            expected: format!("more than {column} features"),
                            actual: format!("{} features (row {i})", row.len()),
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Tuple::new(features, row.label().clone()))
        })
        .collect()
}

/// Identity reducer: keeps every feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoReducer;

impl Reducer for NoReducer {
    fn init(&mut self, _rows: &[Tuple]) -> Result<()> {
        Ok(())
    }

    fn reduce(&self, rows: &[Tuple]) -> Result<Vec<Tuple>> {
        Ok(rows.to_vec())
    }
}

/// Keeps a caller-chosen list of columns. Mostly useful in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualReducer {
    columns: Vec<usize>,
}

impl ManualReducer {
    /// Creates a reducer that keeps `columns`, in that order.
    #[must_use]
    pub fn new(columns: Vec<usize>) -> Self {
        Self { columns }
    }

    /// The retained columns.
    #[must_use]
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }
}

impl Reducer for ManualReducer {
    fn init(&mut self, _rows: &[Tuple]) -> Result<()> {
        Ok(())
    }

    fn reduce(&self, rows: &[Tuple]) -> Result<Vec<Tuple>> {
        select_features(rows, &self.columns)
    }
}

#[cfg(test)]
mod tests;
