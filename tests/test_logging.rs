//! Integration test: driver progress lands in the rotating log file

use polars::prelude::*;
use std::path::Path;
use tourboost::config::{LogConfig, PipelineConfig};
use tourboost::logging;
use tourboost::pipeline::Pipeline;
use tourboost::training::{BoostParams, TrainConfig, XGBoostBooster};
use tourboost::utils::DataSaver;

fn write_features(dir: &Path) {
    let mut train = df!(
        "userid" => &[1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10],
        "f1" => &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "f2" => &[10.0, 9.5, 8.0, 7.5, 6.0, 5.0, 3.5, 3.0, 1.5, 1.0],
        "label" => &[0i64, 0, 0, 0, 0, 1, 1, 1, 1, 1]
    )
    .unwrap();
    let mut test = df!(
        "userid" => &[101i64, 102, 103],
        "f1" => &[1.5, 5.5, 9.5],
        "f2" => &[9.0, 5.5, 1.2]
    )
    .unwrap();
    DataSaver::save_csv(&mut train, &dir.join("features/train.csv")).unwrap();
    DataSaver::save_csv(&mut test, &dir.join("features/test.csv")).unwrap();
}

fn config(dir: &Path) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.train = TrainConfig::new(BoostParams {
        learning_rate: 0.3,
        min_child_weight: 0.0,
        ..Default::default()
    })
    .with_cv(Some(2))
    .with_stratified(true)
    .with_max_round(10)
    .with_early_stop_round(3)
    .with_save_model_path(None);
    config.paths.feature_dir = dir.join("features");
    config.paths.result_dir = dir.join("result");
    config.paths.feature_score_path = dir.join("features/xgb_feature_score.csv");
    config.search.start = 0;
    config.search.end = 2;
    config.search.step = 1;
    config.search.archive_dir = dir.join("archives");
    config.logging = LogConfig {
        file: dir.join("log/xgb_train.log"),
        level: "info".to_string(),
        ..LogConfig::default()
    };
    config
}

#[test]
fn test_driver_messages_written_to_log_file() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let config = config(dir.path());
    let log_file = config.logging.file.clone();

    let guard = logging::init(&config.logging).unwrap();
    let pipeline = Pipeline::new(config, XGBoostBooster::new());
    let dataset = pipeline.load_dataset().unwrap();
    let run = pipeline.run_cv(&dataset).unwrap();
    let names = dataset.feature_names().to_vec();
    let search = pipeline.run_feat_search(&dataset, &names).unwrap();
    drop(guard);

    let contents = std::fs::read_to_string(&log_file).unwrap();
    assert!(contents.contains("X_train.shape=(10, 2), X_test.shape=(3, 2)"));
    assert!(contents.contains("X_train.shape=(10, 1), X_test.shape=(3, 1)"), "search shapes missing");
    assert!(contents.contains(&format!("best_round={}, best_auc={}", run.best_round, run.best_score)));
    assert!(contents.contains("Time cost"));
    assert!(contents.contains(&format!("Saved y_preds to {}", search.archive_path.display())));
    assert!(contents.contains("saved feature scores"));
}

#[test]
fn test_prediction_failure_logged_once() {
    let dir = tempfile::tempdir().unwrap();
    write_features(dir.path());
    let config = config(dir.path());
    let log_file = config.logging.file.clone();

    let guard = logging::init(&config.logging).unwrap();
    let pipeline = Pipeline::new(config, XGBoostBooster::new());
    let dataset = pipeline.load_dataset().unwrap();
    let pruned = dataset.drop_trailing(&["f2".to_string()], 1).unwrap();
    let outcome = pipeline
        .trainer()
        .fit(&pipeline.config().train, &pruned.x_train, &pruned.y_train)
        .unwrap();
    let pred = pipeline
        .predict(&outcome.model, &dataset, &dir.path().join("result/bad.csv"))
        .unwrap();
    drop(guard);

    assert!(pred.is_none());
    let contents = std::fs::read_to_string(&log_file).unwrap();
    assert_eq!(contents.matches("prediction failed").count(), 1);
    assert!(contents.contains("ERROR"));
}
