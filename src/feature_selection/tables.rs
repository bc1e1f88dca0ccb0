//! Discrete probability tables and the mutual-information estimates built
//! from them.

use crate::error::{LernenError, Result};

/// Empirical marginal and joint distributions of discretized features and
/// class labels.
///
/// Feature-pair joints are stored for `f1 > f2` only; the table is
/// symmetric and the diagonal is never materialized.
///
/// # Example
///
/// ```
/// use lernen::feature_selection::ProbabilityTables;
///
/// // Two rows, two features, two buckets, two classes.
/// let discrete = vec![vec![0, 1], vec![1, 1]];
/// let classes = vec![0, 1];
/// let tables = ProbabilityTables::build(&discrete, &classes, 2, 2).expect("valid tables");
///
/// assert!((tables.marginal(0, 0) - 0.5).abs() < 1e-12);
/// assert!((tables.marginal(1, 1) - 1.0).abs() < 1e-12);
/// assert!((tables.joint(1, 0, 1, 0).expect("f1 > f2") - 0.5).abs() < 1e-12);
/// assert!(tables.joint(0, 1, 0, 0).is_none());
///
/// // Feature 0 determines the class: one full bit of information.
/// assert!((tables.class_mutual_information(0) - 1.0).abs() < 1e-12);
/// assert!(tables.class_mutual_information(1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ProbabilityTables {
    num_features: usize,
    num_buckets: usize,
    num_classes: usize,
    /// `[feature][bucket]`
    marginal: Vec<f64>,
    /// `joint[f1][f2]` for `f2 < f1`, each `[b1][b2]` flattened
    joint: Vec<Vec<Vec<f64>>>,
    /// `[class]`
    class_marginal: Vec<f64>,
    /// `[class][feature][bucket]`
    class_joint: Vec<f64>,
}

impl ProbabilityTables {
    /// Counts every marginal and joint distribution over `discrete` rows.
    ///
    /// `class_ids[i]` is the class of row `i`, in `0..num_classes`; every
    /// bucket must be in `0..num_buckets`.
    ///
    /// # Errors
    ///
    /// Returns [`LernenError::EmptyInput`] for no rows and
    /// [`LernenError::DimensionMismatch`] for ragged rows, a class list of
    /// the wrong length, or out-of-range buckets and class ids.
    pub fn build(
        discrete: &[Vec<usize>],
        class_ids: &[usize],
        num_buckets: usize,
        num_classes: usize,
    ) -> Result<Self> {
        let first = discrete
            .first()
            .ok_or_else(|| LernenError::empty_input("probability tables need rows"))?;
        if class_ids.len() != discrete.len() {
            return Err(LernenError::dimension_mismatch(
                "class ids",
                discrete.len(),
                class_ids.len(),
            ));
        }

        let num_features = first.len();
        for row in discrete {
            if row.len() != num_features {
                return Err(LernenError::dimension_mismatch(
                    "discrete row width",
                    num_features,
                    row.len(),
                ));
            }
            if let Some(&bucket) = row.iter().find(|&&b| b >= num_buckets) {
                return Err(LernenError::dimension_mismatch(
                    "bucket <",
                    num_buckets,
                    bucket,
                ));
            }
        }
        if let Some(&class) = class_ids.iter().find(|&&c| c >= num_classes) {
            return Err(LernenError::dimension_mismatch("class id <", num_classes, class));
        }

        let n = discrete.len() as f64;
        let cells = num_buckets * num_buckets;

        let mut marginal = vec![0.0; num_features * num_buckets];
        let mut class_marginal = vec![0.0; num_classes];
        let mut class_joint = vec![0.0; num_classes * num_features * num_buckets];
        let mut joint: Vec<Vec<Vec<f64>>> = (0..num_features)
            .map(|f1| vec![vec![0.0; cells]; f1])
            .collect();

        for (row, &class) in discrete.iter().zip(class_ids) {
            class_marginal[class] += 1.0;
            for (f1, &b1) in row.iter().enumerate() {
                marginal[f1 * num_buckets + b1] += 1.0;
                class_joint[(class * num_features + f1) * num_buckets + b1] += 1.0;
                for (f2, &b2) in row.iter().enumerate().take(f1) {
                    joint[f1][f2][b1 * num_buckets + b2] += 1.0;
                }
            }
        }

        normalize(&mut marginal, n);
        normalize(&mut class_marginal, n);
        normalize(&mut class_joint, n);
        for pairs in &mut joint {
            for table in pairs.iter_mut() {
                normalize(table, n);
            }
        }

        tracing::trace!(
            rows = discrete.len(),
            num_features,
            num_buckets,
            num_classes,
            "built probability tables"
        );

        Ok(Self {
            num_features,
            num_buckets,
            num_classes,
            marginal,
            joint,
            class_marginal,
            class_joint,
        })
    }

    /// Number of feature columns.
    #[must_use]
    pub fn num_features(&self) -> usize {
        self.num_features
    }

    /// Number of buckets per feature.
    #[must_use]
    pub fn num_buckets(&self) -> usize {
        self.num_buckets
    }

    /// Number of distinct classes.
    #[must_use]
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// `P(feature = bucket)`.
    #[must_use]
    pub fn marginal(&self, feature: usize, bucket: usize) -> f64 {
        self.marginal[feature * self.num_buckets + bucket]
    }

    /// `P(f1 = b1, f2 = b2)`. Defined only for `f1 > f2`; `None` otherwise.
    #[must_use]
    pub fn joint(&self, f1: usize, f2: usize, b1: usize, b2: usize) -> Option<f64> {
        if f1 <= f2 {
            return None;
        }
        self.joint
            .get(f1)
            .and_then(|pairs| pairs.get(f2))
            .map(|table| table[b1 * self.num_buckets + b2])
    }

    /// `P(class)`.
    #[must_use]
    pub fn class_marginal(&self, class: usize) -> f64 {
        self.class_marginal[class]
    }

    /// `P(class, feature = bucket)`.
    #[must_use]
    pub fn class_joint(&self, class: usize, feature: usize, bucket: usize) -> f64 {
        self.class_joint[(class * self.num_features + feature) * self.num_buckets + bucket]
    }

    /// Mutual information, in bits, between two features. Symmetric in its
    /// arguments; `I(f; f)` is the entropy of `f`.
    #[must_use]
    pub fn feature_mutual_information(&self, a: usize, b: usize) -> f64 {
        if a == b {
            return (0..self.num_buckets)
                .map(|bucket| self.marginal(a, bucket))
                .filter(|&p| p > 0.0)
                .map(|p| -p * p.log2())
                .sum();
        }

        let (f1, f2) = if a > b { (a, b) } else { (b, a) };
        let table = &self.joint[f1][f2];

        let mut mi = 0.0;
        for b1 in 0..self.num_buckets {
            let p1 = self.marginal(f1, b1);
            for b2 in 0..self.num_buckets {
                let p2 = self.marginal(f2, b2);
                mi += information_term(table[b1 * self.num_buckets + b2], p1, p2);
            }
        }
        mi
    }

    /// Mutual information, in bits, between a feature and the class label.
    #[must_use]
    pub fn class_mutual_information(&self, feature: usize) -> f64 {
        let mut mi = 0.0;
        for class in 0..self.num_classes {
            let pc = self.class_marginal(class);
            for bucket in 0..self.num_buckets {
                let pf = self.marginal(feature, bucket);
                mi += information_term(self.class_joint(class, feature, bucket), pc, pf);
            }
        }
        mi
    }
}

fn normalize(counts: &mut [f64], total: f64) {
    for count in counts {
        *count /= total;
    }
}

/// One `P(x,y) log2(P(x,y) / (P(x)P(y)))` term; zero when any factor is
/// zero.
fn information_term(p_joint: f64, p_a: f64, p_b: f64) -> f64 {
    if p_joint == 0.0 || p_a == 0.0 || p_b == 0.0 {
        return 0.0;
    }
    p_joint * (p_joint / (p_a * p_b)).log2()
}
