//! End-to-end predictor tests against the fixture model

use data_validator::ValidationError;
use feature_engine::FeatureError;
use inference_engine::{
    ErrorKind, GradientBoostedModel, InferenceError, PrognosticsConfig, RulPredictor,
};
use proptest::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn predictor() -> RulPredictor {
    let config = PrognosticsConfig::from_path(fixture("config.json")).unwrap();
    RulPredictor::load(fixture("model.json"), config).unwrap()
}

fn sample_window() -> Vec<Vec<f64>> {
    vec![
        vec![0.1, -0.2, 0.1, 0.0, -0.1, 0.2, 0.3, -0.3, 0.1, 0.2],
        vec![0.2, -0.1, 0.2, 0.1, -0.2, 0.3, 0.2, -0.2, 0.0, 0.1],
        vec![0.1, 0.0, 0.1, 0.2, -0.1, 0.2, 0.4, -0.4, 0.2, 0.3],
        vec![0.3, -0.2, 0.2, 0.1, -0.1, 0.1, 0.3, -0.2, 0.1, 0.2],
        vec![0.2, -0.3, 0.1, 0.0, -0.2, 0.2, 0.2, -0.3, 0.1, 0.1],
        vec![0.1, -0.1, 0.2, 0.2, -0.1, 0.3, 0.4, -0.3, 0.1, 0.2],
        vec![0.4, -0.2, 0.1, 0.1, -0.1, 0.2, 0.3, -0.4, 0.0, 0.1],
        vec![0.2, 0.1, 0.1, 0.0, -0.2, 0.1, 0.2, -0.2, 0.1, 0.2],
        vec![0.3, -0.2, 0.2, 0.1, -0.1, 0.2, 0.5, -0.5, 0.1, 0.3],
        vec![0.5, -0.4, 0.3, 0.2, -0.3, 0.4, 0.6, -0.6, 0.2, 0.4],
        vec![0.4, -0.3, 0.4, 0.3, -0.2, 0.5, 0.7, -0.5, 0.3, 0.5],
        vec![0.6, -0.5, 0.5, 0.4, -0.4, 0.6, 0.8, -0.7, 0.4, 0.6],
        vec![0.7, -0.6, 0.6, 0.5, -0.5, 0.7, 0.9, -0.8, 0.5, 0.7],
        vec![0.8, -0.7, 0.7, 0.6, -0.6, 0.8, 1.0, -0.9, 0.6, 0.8],
        vec![0.9, -0.8, 0.8, 0.7, -0.7, 0.9, 1.1, -1.0, 0.7, 0.9],
    ]
}

#[test]
fn test_fixture_loads() {
    let predictor = predictor();
    assert_eq!(predictor.window_size(), 15);
    assert_eq!(predictor.model().num_trees(), 3);
    assert_eq!(predictor.config().optimal_beta, 1.8);
    assert!(predictor.model_path().is_some());
}

#[test]
fn test_full_window_prediction_is_finite() {
    let rul = predictor().predict_rul(&sample_window()).unwrap();
    assert!(rul.is_finite());
    // Every indicator is non-zero: base 100 + 20 + 2 + last tree
    assert!((121.0..=123.0).contains(&rul), "rul = {}", rul);
}

#[test]
fn test_short_window_reports_both_lengths() {
    let mut window = sample_window();
    window.pop();

    let err = predictor().predict_rul(&window).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(matches!(
        err,
        InferenceError::Features(FeatureError::Validation(
            ValidationError::WindowSizeMismatch {
                expected: 15,
                actual: 14
            }
        ))
    ));
    let msg = err.to_string();
    assert!(msg.contains("14"));
    assert!(msg.contains("15"));
}

#[test]
fn test_empty_snapshot_is_invalid_input() {
    let mut window = sample_window();
    window[6] = Vec::new();

    let err = predictor().predict_rul(&window).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.to_string().contains("Snapshot 6"));
}

#[test]
fn test_prediction_is_deterministic() {
    let predictor = predictor();
    let window = sample_window();
    let a = predictor.predict_rul(&window).unwrap();
    let b = predictor.predict_rul(&window).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn test_prediction_depends_on_order() {
    let predictor = predictor();

    let mut window = sample_window();
    window[0] = vec![0.0; 10];
    let mut swapped = window.clone();
    swapped.swap(0, 14);

    let a = predictor.predict_rul(&window).unwrap();
    let b = predictor.predict_rul(&swapped).unwrap();
    assert!((a - b).abs() > 1.0, "a = {}, b = {}", a, b);
}

#[test]
fn test_missing_config_is_startup_error() {
    let err = PrognosticsConfig::from_path(fixture("missing.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_malformed_model_is_startup_error() {
    let config = PrognosticsConfig::from_path(fixture("config.json")).unwrap();
    let err = RulPredictor::load(fixture("config.json"), config).unwrap_err();
    assert!(matches!(err, InferenceError::ModelLoadError(_)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_valid_windows_give_finite_results(
        window in proptest::collection::vec(
            proptest::collection::vec(-2.0f64..2.0, 2..64),
            15,
        )
    ) {
        let predictor = predictor();
        let rul = predictor.predict_rul(&window).unwrap();
        prop_assert!(rul.is_finite());
        prop_assert_eq!(rul, predictor.predict_rul(&window).unwrap());
    }

    #[test]
    fn prop_wrong_window_length_is_invalid_input(len in 0usize..40) {
        prop_assume!(len != 15);
        let window = vec![vec![0.1, -0.1, 0.2]; len];
        let err = predictor().predict_rul(&window).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let msg = err.to_string();
        let actual = format!("({})", len);
        prop_assert!(msg.contains(&actual));
        prop_assert!(msg.contains("(15)"));
    }
}

#[test]
fn test_early_stopped_artifact_uses_best_iteration() {
    let text = std::fs::read_to_string(fixture("model.json")).unwrap();
    let row = ndarray::Array2::from_elem((1, 15), 1.0f32);

    // 100 + 20 + 2 - 0.5 with every tree
    let full = GradientBoostedModel::from_json_str(&text).unwrap();
    assert_eq!(full.predict(row.view()).unwrap(), vec![121.5]);

    let stopped = text.replace(
        r#""attributes": {},"#,
        r#""attributes": {"best_iteration": "0", "best_score": "12.5"},"#,
    );
    let stopped = GradientBoostedModel::from_json_str(&stopped).unwrap();
    assert_eq!(stopped.num_trees(), 1);
    assert_eq!(stopped.predict(row.view()).unwrap(), vec![120.0]);
}
