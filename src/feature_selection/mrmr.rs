//! Max-relevance, min-redundancy feature selection.

use serde::{Deserialize, Serialize};

use crate::data::{feature_count, index_labels, to_numeric_rows, Tuple};
use crate::error::Result;
use crate::preprocessing::discretize_columns;
use crate::traits::Reducer;

use super::select_features;
use super::tables::ProbabilityTables;

/// Plain-data configuration for [`MrmrReducer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MrmrConfig {
    /// Number of features to keep (fan-out)
    pub target_feature_count: usize,
    /// Equal-width buckets per feature used to estimate probabilities
    pub num_buckets: usize,
}

impl Default for MrmrConfig {
    fn default() -> Self {
        Self {
            target_feature_count: MrmrReducer::DEFAULT_TARGET_FEATURE_COUNT,
            num_buckets: MrmrReducer::DEFAULT_NUM_BUCKETS,
        }
    }
}

impl MrmrConfig {
    /// Parses a JSON object; omitted fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::LernenError::Config`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Greedy mRMR reducer.
///
/// `init` discretizes every numeric column, estimates the mutual information
/// of each feature with the label and with every other feature, then picks
/// `fan_out` features one at a time. A candidate `f` scores
///
/// ```text
/// I(f; class) - mean_{s in selected} I(f; s)
/// ```
///
/// and the best-scoring candidate is appended to the selection. Equal scores
/// resolve to the lowest feature index.
///
/// When the input has no more features than requested, every feature is
/// kept in its original order and no statistics are computed.
///
/// # Example
///
/// ```
/// use lernen::prelude::*;
///
/// // Column 0 tracks the label, column 1 is noise.
/// let rows: Vec<Tuple> = (0..8)
///     .map(|i: i32| {
///         let label = if i < 4 { "low" } else { "high" };
///         Tuple::from_numeric(&[f64::from(i / 4), f64::from(i % 2)], Feature::from(label))
///     })
///     .collect();
///
/// let mut reducer = MrmrReducer::new().with_target_feature_count(1).with_num_buckets(2);
/// reducer.init(&rows).expect("numeric rows");
/// assert_eq!(reducer.selected_features(), &[0]);
///
/// let reduced = reducer.reduce(&rows).expect("initialized reducer");
/// assert_eq!(reduced[5].features(), &[Feature::Float(1.0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrmrReducer {
    target_feature_count: usize,
    num_buckets: usize,
    fan_in: usize,
    fan_out: usize,
    selected: Vec<usize>,
    relevance: Vec<f64>,
}

impl Default for MrmrReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl MrmrReducer {
    /// Default fan-out.
    pub const DEFAULT_TARGET_FEATURE_COUNT: usize = 100;
    /// Default discretization resolution.
    pub const DEFAULT_NUM_BUCKETS: usize = 20;

    /// Creates a reducer with the default fan-out and bucket count.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target_feature_count: Self::DEFAULT_TARGET_FEATURE_COUNT,
            num_buckets: Self::DEFAULT_NUM_BUCKETS,
            fan_in: 0,
            fan_out: 0,
            selected: Vec::new(),
            relevance: Vec::new(),
        }
    }

    /// Sets the number of features to keep. Zero selects the default.
    #[must_use]
    pub fn with_target_feature_count(mut self, count: usize) -> Self {
        self.target_feature_count = if count == 0 {
            Self::DEFAULT_TARGET_FEATURE_COUNT
        } else {
            count
        };
        self
    }

    /// Sets the number of discretization buckets. Zero selects the default.
    #[must_use]
    pub fn with_num_buckets(mut self, num_buckets: usize) -> Self {
        self.num_buckets = if num_buckets == 0 {
            Self::DEFAULT_NUM_BUCKETS
        } else {
            num_buckets
        };
        self
    }

    /// Builds a reducer from configuration.
    #[must_use]
    pub fn from_config(config: &MrmrConfig) -> Self {
        Self::new()
            .with_target_feature_count(config.target_feature_count)
            .with_num_buckets(config.num_buckets)
    }

    /// Requested fan-out.
    #[must_use]
    pub fn target_feature_count(&self) -> usize {
        self.target_feature_count
    }

    /// Buckets per feature.
    #[must_use]
    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    /// Selected column indices, in selection order. Empty before `init`.
    #[must_use]
    pub fn selected_features(&self) -> &[usize] {
        &self.selected
    }

    /// Width of the rows seen by `init`.
    #[must_use]
    pub fn fan_in(&self) -> usize {
        self.fan_in
    }

    /// Width of the rows produced by `reduce`.
    #[must_use]
    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// `I(f; class)` for every input feature, in bits. Empty when `init`
    /// took the keep-everything path.
    #[must_use]
    pub fn relevance(&self) -> &[f64] {
        &self.relevance
    }

    fn select(&mut self, tables: &ProbabilityTables) {
        let fan_in = self.fan_in;
        let mut chosen = vec![false; fan_in];
        // Running Σ I(f; s) over the selected s, per candidate f.
        let mut redundancy = vec![0.0; fan_in];

        for _ in 0..self.fan_out {
            let mut best: Option<(usize, f64)> = None;

            for f in (0..fan_in).filter(|&f| !chosen[f]) {
                let score = if self.selected.is_empty() {
                    self.relevance[f]
                } else {
                    self.relevance[f] - redundancy[f] / self.selected.len() as f64
                };
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((f, score));
                }
            }

            let Some((winner, score)) = best else {
                break;
            };
            tracing::trace!(feature = winner, score, "mrmr picked feature");

            chosen[winner] = true;
            self.selected.push(winner);
            for f in (0..fan_in).filter(|&f| !chosen[f]) {
                redundancy[f] += tables.feature_mutual_information(f, winner);
            }
        }
    }
}

impl Reducer for MrmrReducer {
    fn init(&mut self, rows: &[Tuple]) -> Result<()> {
        let fan_in = feature_count(rows)?;

        self.fan_in = fan_in;
        self.selected.clear();
        self.relevance.clear();

        if fan_in <= self.target_feature_count {
            self.fan_out = fan_in;
            self.selected = (0..fan_in).collect();
            tracing::info!(fan_in, "mrmr keeps every feature");
            return Ok(());
        }
        self.fan_out = self.target_feature_count;

        let numeric = to_numeric_rows(rows)?;
        let discrete = discretize_columns(&numeric, self.num_buckets);
        let (labels, class_ids) = index_labels(rows);
        let tables = ProbabilityTables::build(&discrete, &class_ids, self.num_buckets, labels.len())?;

        self.relevance = (0..fan_in)
            .map(|f| tables.class_mutual_information(f))
            .collect();
        self.select(&tables);

        tracing::info!(
            fan_in,
            fan_out = self.fan_out,
            classes = labels.len(),
            selected = ?self.selected,
            "mrmr selected features"
        );
        Ok(())
    }

    fn reduce(&self, rows: &[Tuple]) -> Result<Vec<Tuple>> {
        if self.selected.is_empty() {
            return Ok(rows.to_vec());
        }
        select_features(rows, &self.selected)
    }
}
