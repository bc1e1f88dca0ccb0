//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use lernen::prelude::*;
//! ```

pub use crate::classification::LogisticRegression;
pub use crate::data::{Feature, Label, Tuple};
pub use crate::error::{LernenError, Result};
pub use crate::feature_selection::{ManualReducer, MrmrReducer, NoReducer};
pub use crate::optim::{GradientDescent, Optimizer, StochasticGradientDescent};
pub use crate::preprocessing::{discretize_features, discretize_value};
pub use crate::traits::{Classifier, Reducer};
