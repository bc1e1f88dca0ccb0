use super::*;
use crate::data::Feature;

fn label(name: &str) -> Feature {
    Feature::from(name)
}

/// 16 rows, 4 features:
/// - f0 agrees with the label on 14 rows
/// - f1 is f0 with row 0 flipped (a near-duplicate)
/// - f2 is independent of f0 and weakly informative
/// - f3 is constant
fn redundant_dataset() -> Vec<Tuple> {
    (0..16)
        .map(|i: usize| {
            let f0 = if i < 8 { 0.0 } else { 1.0 };
            let f1 = if i == 0 { 1.0 } else { f0 };
            let f2 = if matches!(i, 0..=3 | 8..=11) { 0.0 } else { 1.0 };
            let class = match i {
                7 => "B",
                8 => "A",
                _ if i < 8 => "A",
                _ => "B",
            };
            Tuple::from_numeric(&[f0, f1, f2, 5.0], label(class))
        })
        .collect()
}

// ==================== select_features / simple reducers ====================

#[test]
fn test_select_features_reorders_and_keeps_labels() {
    let rows = vec![
        Tuple::from_ints(&[1, 2, 3], label("x")),
        Tuple::from_ints(&[4, 5, 6], label("y")),
    ];
    let got = select_features(&rows, &[2, 2, 0]).expect("columns in range");
    assert_eq!(got[0].features(), &[Feature::Int(3), Feature::Int(3), Feature::Int(1)]);
    assert_eq!(got[1].label(), &label("y"));
}

#[test]
fn test_select_features_out_of_range() {
    let rows = vec![
        Tuple::from_ints(&[1, 2, 3], label("x")),
        Tuple::from_ints(&[4], label("y")),
    ];
    let err = select_features(&rows, &[1]).expect_err("row 1 is too narrow");
    assert!(matches!(err, LernenError::DimensionMismatch { .. }));
    assert!(err.to_string().contains("row 1"));
}

#[test]
fn test_no_reducer_is_identity() {
    let rows = vec![Tuple::new(
        vec![Feature::from("s"), Feature::Missing],
        label("x"),
    )];
    let mut reducer = NoReducer;
    reducer.init(&rows).expect("no-op");
    assert_eq!(reducer.reduce(&rows).expect("identity"), rows);
}

#[test]
fn test_manual_reducer() {
    let rows = vec![Tuple::from_ints(&[7, 8, 9, 10], label("x"))];
    let mut reducer = ManualReducer::new(vec![1, 3]);
    reducer.init(&rows).expect("no-op");
    assert_eq!(reducer.columns(), &[1, 3]);
    let got = reducer.reduce(&rows).expect("columns in range");
    assert_eq!(got[0].features(), &[Feature::Int(8), Feature::Int(10)]);
}

// ==================== MrmrReducer ====================

#[test]
fn test_mrmr_defaults_and_config() {
    let reducer = MrmrReducer::new();
    assert_eq!(reducer.target_feature_count(), 100);
    assert_eq!(reducer.num_buckets(), 20);
    assert_eq!(
        MrmrReducer::new().with_target_feature_count(0).with_num_buckets(0),
        reducer
    );

    let config = MrmrConfig::from_json(r#"{"target_feature_count": 3}"#).expect("valid json");
    let reducer = MrmrReducer::from_config(&config);
    assert_eq!(reducer.target_feature_count(), 3);
    assert_eq!(reducer.num_buckets(), 20);

    assert!(matches!(
        MrmrConfig::from_json("{"),
        Err(LernenError::Config(_))
    ));
}

#[test]
fn test_mrmr_empty_input() {
    let mut reducer = MrmrReducer::new();
    assert!(matches!(
        reducer.init(&[]),
        Err(LernenError::EmptyInput { .. })
    ));
}

#[test]
fn test_mrmr_short_circuit_keeps_everything() {
    let rows = vec![
        Tuple::new(vec![Feature::Int(1), Feature::from("red")], label("x")),
        Tuple::new(vec![Feature::Int(2), Feature::from("blue")], label("y")),
    ];
    let mut reducer = MrmrReducer::new().with_target_feature_count(2);
    reducer.init(&rows).expect("short circuit skips numeric analysis");

    assert_eq!(reducer.fan_in(), 2);
    assert_eq!(reducer.fan_out(), 2);
    assert_eq!(reducer.selected_features(), &[0, 1]);
    assert!(reducer.relevance().is_empty());
    assert_eq!(reducer.reduce(&rows).expect("initialized"), rows);
}

#[test]
fn test_mrmr_prefers_distinct_feature_over_duplicate() {
    let rows = redundant_dataset();
    let mut reducer = MrmrReducer::new()
        .with_target_feature_count(2)
        .with_num_buckets(2);
    reducer.init(&rows).expect("numeric rows");

    assert_eq!(reducer.fan_in(), 4);
    assert_eq!(reducer.fan_out(), 2);
    assert_eq!(reducer.selected_features(), &[0, 2]);

    let relevance = reducer.relevance();
    assert_eq!(relevance.len(), 4);
    assert!(relevance[0] > relevance[1]);
    assert!(relevance[1] > relevance[2]);
    assert!(relevance[3].abs() < 1e-12);

    let reduced = reducer.reduce(&rows).expect("initialized");
    assert_eq!(reduced.len(), rows.len());
    assert_eq!(
        reduced[12].features(),
        &[Feature::Float(1.0), Feature::Float(1.0)]
    );
    assert_eq!(reduced[12].label(), rows[12].label());
}

#[test]
fn test_mrmr_ties_resolve_to_lowest_index() {
    // Columns 1 and 2 are identical copies; column 0 is constant.
    let rows: Vec<Tuple> = (0..6)
        .map(|i: i32| {
            let v = f64::from(i % 2);
            let class = if i % 2 == 0 { "even" } else { "odd" };
            Tuple::from_numeric(&[3.0, v, v], label(class))
        })
        .collect();
    let mut reducer = MrmrReducer::new()
        .with_target_feature_count(1)
        .with_num_buckets(2);
    reducer.init(&rows).expect("numeric rows");
    assert_eq!(reducer.selected_features(), &[1]);
}

#[test]
fn test_mrmr_reduce_before_init_passes_through() {
    let rows = redundant_dataset();
    let reducer = MrmrReducer::new();
    assert_eq!(reducer.reduce(&rows).expect("no selection"), rows);
}

#[test]
fn test_mrmr_reduce_is_idempotent() {
    let rows = redundant_dataset();
    let mut reducer = MrmrReducer::new().with_target_feature_count(3);
    reducer.init(&rows).expect("numeric rows");
    let first = reducer.reduce(&rows).expect("initialized");
    let second = reducer.reduce(&rows).expect("initialized");
    assert_eq!(first, second);
    assert_eq!(first[0].len(), 3);
}

#[test]
fn test_mrmr_second_init_starts_over() {
    let mut reducer = MrmrReducer::new()
        .with_target_feature_count(2)
        .with_num_buckets(2);
    reducer.init(&redundant_dataset()).expect("numeric rows");

    let narrow = vec![Tuple::from_ints(&[1], label("x"))];
    reducer.init(&narrow).expect("short circuit");
    assert_eq!(reducer.fan_in(), 1);
    assert_eq!(reducer.selected_features(), &[0]);
    assert!(reducer.relevance().is_empty());
}

#[test]
fn test_mrmr_rejects_non_numeric_features() {
    let rows = vec![
        Tuple::new(vec![Feature::Int(1), Feature::Int(2)], label("x")),
        Tuple::new(vec![Feature::Int(3), Feature::from("oops")], label("y")),
    ];
    let mut reducer = MrmrReducer::new().with_target_feature_count(1);
    assert!(matches!(
        reducer.init(&rows),
        Err(LernenError::NonNumericFeature { row: 1, column: 1 })
    ));
}

#[test]
fn test_mrmr_rejects_ragged_rows() {
    let rows = vec![
        Tuple::from_ints(&[1, 2, 3], label("x")),
        Tuple::from_ints(&[1, 2], label("y")),
    ];
    let mut reducer = MrmrReducer::new().with_target_feature_count(1);
    assert!(matches!(
        reducer.init(&rows),
        Err(LernenError::DimensionMismatch { .. })
    ));
}

// ==================== ProbabilityTables ====================

#[test]
fn test_tables_sum_to_one() {
    let discrete = vec![vec![0, 2, 1], vec![1, 2, 0], vec![2, 0, 0], vec![0, 1, 1]];
    let classes = vec![0, 1, 1, 0];
    let tables = ProbabilityTables::build(&discrete, &classes, 3, 2).expect("valid tables");

    assert_eq!(tables.num_features(), 3);
    assert_eq!(tables.num_buckets(), 3);
    assert_eq!(tables.num_classes(), 2);

    for f in 0..3 {
        let total: f64 = (0..3).map(|b| tables.marginal(f, b)).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }
    let joint: f64 = (0..3)
        .flat_map(|b1| (0..3).map(move |b2| (b1, b2)))
        .filter_map(|(b1, b2)| tables.joint(2, 0, b1, b2))
        .sum();
    assert!((joint - 1.0).abs() < 1e-12);

    let classes: f64 = (0..2).map(|c| tables.class_marginal(c)).sum();
    assert!((classes - 1.0).abs() < 1e-12);
    assert!((tables.class_joint(1, 1, 2) - 0.25).abs() < 1e-12);
}

#[test]
fn test_tables_joint_requires_larger_index_first() {
    let tables = ProbabilityTables::build(&[vec![0, 1]], &[0], 2, 1).expect("valid tables");
    assert!(tables.joint(1, 0, 1, 0).is_some());
    assert!(tables.joint(0, 1, 0, 1).is_none());
    assert!(tables.joint(1, 1, 1, 1).is_none());
}

#[test]
fn test_tables_validation() {
    assert!(matches!(
        ProbabilityTables::build(&[], &[], 2, 1),
        Err(LernenError::EmptyInput { .. })
    ));
    assert!(matches!(
        ProbabilityTables::build(&[vec![0]], &[0, 0], 2, 1),
        Err(LernenError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        ProbabilityTables::build(&[vec![0, 1], vec![0]], &[0, 0], 2, 1),
        Err(LernenError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        ProbabilityTables::build(&[vec![2]], &[0], 2, 1),
        Err(LernenError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        ProbabilityTables::build(&[vec![0]], &[1], 2, 1),
        Err(LernenError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_feature_mutual_information_symmetric() {
    let discrete = vec![vec![0, 0, 1], vec![1, 1, 1], vec![1, 0, 0], vec![0, 1, 0]];
    let tables = ProbabilityTables::build(&discrete, &[0, 1, 1, 0], 2, 2).expect("valid tables");

    for a in 0..3 {
        for b in 0..3 {
            let ab = tables.feature_mutual_information(a, b);
            let ba = tables.feature_mutual_information(b, a);
            assert!((ab - ba).abs() < 1e-12);
            assert!(ab >= -1e-12);
        }
    }
    // A balanced binary feature carries one bit.
    assert!((tables.feature_mutual_information(0, 0) - 1.0).abs() < 1e-12);
    // Features 0 and 1 are independent here.
    assert!(tables.feature_mutual_information(0, 1).abs() < 1e-12);
}
