//! Integration tests for artifact loading and the prediction pipeline
//!
//! Exercises the full startup path: write scaler/model JSON exports to a
//! temporary folder, initialize a pipeline from them, and predict. The
//! fixture model is small enough to verify by hand: five stumps in scaled
//! space with binary-distinct leaf weights, so any change in which branches
//! fire provably changes the final score.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use mpp_common::model::RegressionTree;
use mpp_common::{
    Error, FeatureRecord, GradientBoostingModel, InferencePipeline, StandardScaler, FEATURE_NAMES,
};

fn fitted_names() -> Vec<String> {
    FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
}

fn fitted_scaler() -> StandardScaler {
    StandardScaler::from_parts(
        fitted_names(),
        vec![20.0, 7.0, 6.75, 400.0, 20.0],
        vec![5.0, 0.5, 2.0, 100.0, 10.0],
    )
    .unwrap()
}

/// Stump on `feature` at scaled 0.0: `-weight` at or below, `+weight` above
fn stump(feature: i32, weight: f64) -> RegressionTree {
    RegressionTree::from_arrays(
        vec![feature, -2, -2],
        vec![0.0, -2.0, -2.0],
        vec![1, -1, -1],
        vec![2, -1, -1],
        vec![0.0, -weight, weight],
    )
}

/// One stump per feature, weights 0.1 * 2^i so no two branch patterns can
/// sum to the same score
fn fitted_model() -> GradientBoostingModel {
    let trees = (0..5)
        .map(|i| stump(i as i32, 0.1 * f64::powi(2.0, i as i32)))
        .collect();
    GradientBoostingModel::from_parts(5, 2.5, 0.1, trees).unwrap()
}

fn write_artifacts(dir: &Path) -> (PathBuf, PathBuf) {
    let scaler_path = dir.join("scaler_aug.json");
    let model_path = dir.join("champion_gradientboost_model.json");
    fs::write(
        &scaler_path,
        serde_json::to_string_pretty(&fitted_scaler()).unwrap(),
    )
    .unwrap();
    fs::write(
        &model_path,
        serde_json::to_string_pretty(&fitted_model()).unwrap(),
    )
    .unwrap();
    (scaler_path, model_path)
}

fn example_record() -> FeatureRecord {
    FeatureRecord::new(28.0, 7.0, 6.5, 500.0, 10.0)
}

#[test]
fn test_initialize_loads_artifact_pair() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());

    let pipeline = InferencePipeline::initialize(&scaler_path, &model_path).unwrap();
    assert_eq!(pipeline.n_trees(), 5);

    // Scaled example input is (1.6, 0.0, -0.125, 1.0, -1.0): stumps fire
    // (+0.1, -0.2, -0.4, +0.8, -1.6), so 2.5 + 0.1 * -1.3 = 2.37.
    let prediction = pipeline.predict(&example_record()).unwrap();
    assert!((prediction - 2.37).abs() < 1e-9);
}

#[test]
fn test_example_scenario_yields_finite_concentration() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());
    let pipeline = InferencePipeline::initialize(&scaler_path, &model_path).unwrap();

    let prediction = pipeline.predict(&example_record()).unwrap();
    assert!(prediction.is_finite());
    assert!(prediction > 0.0);
}

#[test]
fn test_initialize_missing_scaler_file() {
    let dir = tempdir().unwrap();
    let (_, model_path) = write_artifacts(dir.path());

    let result = InferencePipeline::initialize(&dir.path().join("absent.json"), &model_path);
    assert!(matches!(result, Err(Error::ArtifactLoad(_))));
}

#[test]
fn test_initialize_missing_model_file() {
    let dir = tempdir().unwrap();
    let (scaler_path, _) = write_artifacts(dir.path());

    let result = InferencePipeline::initialize(&scaler_path, &dir.path().join("absent.json"));
    assert!(matches!(result, Err(Error::ArtifactLoad(_))));
}

#[test]
fn test_initialize_corrupt_scaler_file() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());
    fs::write(&scaler_path, "{ truncated").unwrap();

    let result = InferencePipeline::initialize(&scaler_path, &model_path);
    assert!(matches!(result, Err(Error::ArtifactLoad(_))));
}

#[test]
fn test_initialize_rejects_unsupported_format_version() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());

    let mut doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&scaler_path).unwrap()).unwrap();
    doc["format_version"] = serde_json::json!(99);
    fs::write(&scaler_path, doc.to_string()).unwrap();

    let result = InferencePipeline::initialize(&scaler_path, &model_path);
    assert!(matches!(result, Err(Error::ArtifactLoad(_))));
}

#[test]
fn test_initialize_rejects_renamed_scaler_column() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());

    let mut names = fitted_names();
    names[0] = "Temp".to_string();
    let renamed = StandardScaler::from_parts(
        names,
        vec![20.0, 7.0, 6.75, 400.0, 20.0],
        vec![5.0, 0.5, 2.0, 100.0, 10.0],
    )
    .unwrap();
    fs::write(&scaler_path, serde_json::to_string(&renamed).unwrap()).unwrap();

    let result = InferencePipeline::initialize(&scaler_path, &model_path);
    assert!(matches!(result, Err(Error::ArtifactLoad(_))));
}

#[test]
fn test_initialize_rejects_model_arity_mismatch() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());

    let narrow =
        GradientBoostingModel::from_parts(4, 2.5, 0.1, vec![stump(0, 0.1)]).unwrap();
    fs::write(&model_path, serde_json::to_string(&narrow).unwrap()).unwrap();

    let result = InferencePipeline::initialize(&scaler_path, &model_path);
    assert!(matches!(result, Err(Error::ArtifactLoad(_))));
}

#[test]
fn test_same_input_same_output_across_fresh_loads() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());

    let first = InferencePipeline::initialize(&scaler_path, &model_path)
        .unwrap()
        .predict(&example_record())
        .unwrap();
    let second = InferencePipeline::initialize(&scaler_path, &model_path)
        .unwrap()
        .predict(&example_record())
        .unwrap();

    // Bit-for-bit, not approximately: same artifacts, same input, same
    // arithmetic.
    assert_eq!(first, second);
}

#[test]
fn test_repeated_predictions_are_deterministic() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());
    let pipeline = InferencePipeline::initialize(&scaler_path, &model_path).unwrap();

    let baseline = pipeline.predict(&example_record()).unwrap();
    for _ in 0..10 {
        assert_eq!(pipeline.predict(&example_record()).unwrap(), baseline);
    }
}

#[test]
fn test_each_field_swap_changes_prediction() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());
    let pipeline = InferencePipeline::initialize(&scaler_path, &model_path).unwrap();

    let raw = [28.0, 7.0, 6.5, 500.0, 10.0];
    let record_from = |v: &[f64; 5]| FeatureRecord::new(v[0], v[1], v[2], v[3], v[4]);
    let baseline = pipeline.predict(&record_from(&raw)).unwrap();

    // Feature order is part of the contract: with this fixture, swapping
    // any two readings flips at least one stump, so every swap must move
    // the score.
    for i in 0..raw.len() {
        for j in (i + 1)..raw.len() {
            let mut swapped = raw;
            swapped.swap(i, j);
            let prediction = pipeline.predict(&record_from(&swapped)).unwrap();
            assert_ne!(
                prediction, baseline,
                "swapping fields {} and {} left the prediction unchanged",
                i, j
            );
        }
    }
}

#[test]
fn test_transform_rejects_four_and_six_field_vectors() {
    // Wrong arity is rejected outright, never truncated or padded to fit.
    let scaler = fitted_scaler();

    let four = scaler.transform(&[28.0, 7.0, 6.5, 500.0]);
    assert!(matches!(four, Err(Error::Transform(_))));

    let six = scaler.transform(&[28.0, 7.0, 6.5, 500.0, 10.0, 1.0]);
    assert!(matches!(six, Err(Error::Transform(_))));
}

#[test]
fn test_failed_prediction_does_not_poison_pipeline() {
    let dir = tempdir().unwrap();
    let (scaler_path, model_path) = write_artifacts(dir.path());
    let pipeline = InferencePipeline::initialize(&scaler_path, &model_path).unwrap();

    let baseline = pipeline.predict(&example_record()).unwrap();

    let bad = FeatureRecord::new(28.0, f64::NAN, 6.5, 500.0, 10.0);
    assert!(matches!(pipeline.predict(&bad), Err(Error::Transform(_))));

    assert_eq!(pipeline.predict(&example_record()).unwrap(), baseline);
}
