//! Integration tests for the lernen toolkit.
//!
//! These tests verify end-to-end workflows combining multiple components.

use lernen::classification::LogisticRegressionConfig;
use lernen::feature_selection::MrmrConfig;
use lernen::optim::{GradientFn, ObjectiveFn, SgdConfig};
use lernen::prelude::*;

/// 20 rows, 5 features: f0 separates the classes, f1 is f0 rescaled,
/// f2 and f3 are periodic noise, f4 is constant.
fn wide_dataset() -> Vec<Tuple> {
    (0..20)
        .map(|i: i32| {
            let sign = if i < 10 { 1.0 } else { -1.0 };
            let f0 = sign * (10.0 + f64::from(i % 3) * 0.5);
            let f1 = f0 * 1.01;
            let f2 = f64::from(i % 3);
            let f3 = f64::from((i * 7) % 5);
            let label = if i < 10 { "A" } else { "B" };
            Tuple::from_numeric(&[f0, f1, f2, f3, 1.0], Feature::from(label))
        })
        .collect()
}

#[test]
fn test_mrmr_then_logistic_regression() {
    let rows = wide_dataset();

    let mut reducer = MrmrReducer::new()
        .with_target_feature_count(2)
        .with_num_buckets(4);
    reducer.init(&rows).expect("numeric rows");
    assert_eq!(reducer.fan_in(), 5);
    assert_eq!(reducer.fan_out(), 2);
    // f0 and f1 discretize identically; the lower index wins.
    assert_eq!(reducer.selected_features()[0], 0);

    let mut model = LogisticRegression::new()
        .with_reducer(reducer)
        .with_optimizer(GradientDescent::default());
    model.train(&rows).expect("numeric rows");
    assert_eq!(model.num_features(), 2);

    let (labels, _) = model
        .classify(&[
            Tuple::from_numeric(&[9.0, 9.1, 1.0, 2.0, 1.0], Feature::Missing),
            Tuple::from_numeric(&[-9.0, -9.1, 1.0, 2.0, 1.0], Feature::Missing),
        ])
        .expect("trained model");
    assert_eq!(labels, vec![Feature::from("A"), Feature::from("B")]);
}

#[test]
fn test_configured_pipeline_from_json() {
    let sgd = SgdConfig::from_json(r#"{"max_iterations": 500, "batch_size": 4, "random_state": 11}"#)
        .expect("valid json");
    let mrmr = MrmrConfig::from_json(r#"{"target_feature_count": 1, "num_buckets": 4}"#)
        .expect("valid json");
    let lr = LogisticRegressionConfig::from_json(r#"{"l2_penalty": 0.5}"#).expect("valid json");

    let mut model = LogisticRegression::from_config(&lr)
        .expect("finite penalty")
        .with_reducer(MrmrReducer::from_config(&mrmr))
        .with_optimizer(StochasticGradientDescent::from_config(&sgd).expect("finite settings"));
    model.train(&wide_dataset()).expect("numeric rows");

    assert_eq!(model.num_features(), 1);
    assert!((model.l2_penalty() - 0.5).abs() < f64::EPSILON);
    let (labels, _) = model
        .classify(&[Tuple::from_numeric(&[-12.0, 0.0, 0.0, 0.0, 0.0], Feature::Missing)])
        .expect("trained model");
    assert_eq!(labels, vec![Feature::from("B")]);
}

#[test]
fn test_seeded_training_is_reproducible() {
    let train = |seed: u64| {
        let mut model = LogisticRegression::new().with_optimizer(
            StochasticGradientDescent::new(300, 1e-4, 1e-12, 3).with_random_state(seed),
        );
        model.train(&wide_dataset()).expect("numeric rows");
        (model.weights().to_vec(), model.intercepts().to_vec())
    };
    assert_eq!(train(5), train(5));
}

#[test]
fn test_json_rows_train_a_model() {
    let raw = serde_json::json!([
        [[3, 3.5], "up"],
        [[4, 4.5], "up"],
        [[-3, -3.5], "down"],
        [[-4, -4.5], "down"]
    ]);

    let rows: Vec<Tuple> = raw
        .as_array()
        .expect("array of rows")
        .iter()
        .map(|entry| {
            let values = entry[0].as_array().expect("feature array");
            Tuple::from_json(values, &entry[1]).expect("scalar values")
        })
        .collect();
    assert_eq!(rows[0].features(), &[Feature::Int(3), Feature::Float(3.5)]);

    let mut model = LogisticRegression::new().with_optimizer(GradientDescent::default());
    model.train(&rows).expect("numeric rows");
    let query = Tuple::from_json(&[serde_json::json!(5), serde_json::json!(5)], &serde_json::Value::Null)
        .expect("scalar values");
    assert_eq!(query.label(), &Feature::Missing);
    let (labels, _) = model.classify(&[query]).expect("trained model");
    assert_eq!(labels, vec![Feature::from("up")]);
}

#[test]
fn test_discretized_rows_feed_mrmr() {
    let rows = wide_dataset();
    let discretized = discretize_features(&rows, 4);
    assert!(discretized
        .iter()
        .flat_map(|r| r.features())
        .all(|f| matches!(f, Feature::Int(0..=3))));

    // Discretizing first does not change what mRMR sees.
    let mut raw = MrmrReducer::new().with_target_feature_count(3).with_num_buckets(4);
    let mut pre = raw.clone();
    raw.init(&rows).expect("numeric rows");
    pre.init(&discretized).expect("numeric rows");
    assert_eq!(raw.selected_features(), pre.selected_features());
}

/// Non-batch optimizer that takes a single gradient step.
#[derive(Debug)]
struct FixedStep;

impl Optimizer for FixedStep {
    fn supports_batch(&self) -> bool {
        false
    }

    fn optimize(
        &mut self,
        initial_params: &[f64],
        _objective: &ObjectiveFn<'_>,
        gradient: &GradientFn<'_>,
    ) -> Result<Vec<f64>> {
        let g = gradient(initial_params);
        Ok(initial_params.iter().zip(&g).map(|(p, g)| p - 1e-3 * g).collect())
    }
}

#[test]
fn test_custom_optimizer_uses_non_batch_path() {
    let mut optimizer = FixedStep;
    assert!(matches!(
        optimizer.optimize_batch(&[0.0], &[0], &|_: &[f64]| 0.0, &|_: &[f64], _: &[usize]| vec![0.0]),
        Err(LernenError::UnsupportedMode { .. })
    ));

    let mut model = LogisticRegression::new().with_optimizer(FixedStep);
    model.train(&wide_dataset()).expect("non-batch optimizer");
    assert!(model.is_trained());
    assert!(model.weights()[0][0] > 0.0);
}

#[test]
fn test_training_emits_tracing_events() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("lernen=debug"))
        .with_test_writer()
        .try_init();

    let mut model = LogisticRegression::new()
        .with_reducer(MrmrReducer::new().with_target_feature_count(2))
        .with_optimizer(GradientDescent::new(50, 1e-3, 1e-9));
    model.train(&wide_dataset()).expect("numeric rows");
    assert!(model.is_trained());
}
