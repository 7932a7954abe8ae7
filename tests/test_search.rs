//! Integration test: feature search over trailing-feature drop counts

use ndarray::{Array1, Array2};
use tourboost::config::PipelineConfig;
use tourboost::inference::{Predictor, ResultTable};
use tourboost::search::{FeatureSearch, SearchArchive};
use tourboost::training::{BoostParams, FeatureMatrix, TrainConfig, Trainer, XGBoostBooster};

const N_FEATURES: usize = 155;

fn data() -> (FeatureMatrix, FeatureMatrix, Array1<f64>, Vec<String>) {
    let names: Vec<String> = (0..N_FEATURES).map(|j| format!("feat_{}", j)).collect();
    let y = Array1::from_shape_fn(40, |i| (i % 2) as f64);
    let train = Array2::from_shape_fn((40, N_FEATURES), |(i, j)| {
        ((i * (j + 3)) % 17) as f64 + if j < 5 { y[i] * 4.0 } else { 0.0 }
    });
    let test = Array2::from_shape_fn((6, N_FEATURES), |(i, j)| ((i + j) % 7) as f64);
    (
        FeatureMatrix::new(names.clone(), train).unwrap(),
        FeatureMatrix::new(names.clone(), test).unwrap(),
        y,
        names,
    )
}

#[test]
fn test_default_range_runs_fifteen_iterations() {
    let dir = tempfile::tempdir().unwrap();
    let initial = dir.path().join("xgb_feat_search_pred_105.zip");
    SearchArchive::new().save(&initial).unwrap();

    let mut config = PipelineConfig::default();
    config.train = TrainConfig::new(BoostParams { min_child_weight: 1.0, ..Default::default() })
        .with_cv(None)
        .with_max_round(10)
        .with_early_stop_round(3)
        .with_save_model_path(None);
    config.search.resume_archive = Some(initial);
    config.search.archive_dir = dir.path().join("archives");
    config.paths.result_dir = dir.path().join("result");

    let (x_train, x_test, y, names) = data();
    let booster = XGBoostBooster::new();
    let trainer = Trainer::new(booster);
    let predictor = Predictor::new(&booster, ResultTable::row_index(6, "orderType").unwrap());

    let report = FeatureSearch::new(
        &trainer,
        &predictor,
        &config.train,
        &config.search,
        &config.paths.result_dir,
    )
    .run(&x_train, &x_test, &y, &names)
    .unwrap();

    assert_eq!(report.iterations, 15);
    assert_eq!(report.archive.y_pred_list.len(), 15);
    assert_eq!(report.archive.aucs.len(), 15);
    assert!(report.archive.y_pred_list.iter().all(Option::is_some));

    let file_name = report.archive_path.file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("xgb_feat_search_pred_") && file_name.ends_with(".zip"));

    let reloaded = SearchArchive::load(&report.archive_path).unwrap();
    assert_eq!(reloaded.y_pred_list.len(), 15);
    assert_eq!(reloaded.best_auc(), report.best_auc);

    let results: Vec<String> = std::fs::read_dir(&config.paths.result_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(results.len(), 15);
    assert!(results.iter().any(|n| n.starts_with("result_xgb_search_feat_106-")));
    assert!(results.iter().any(|n| n.starts_with("result_xgb_search_feat_148-")));
}

#[test]
fn test_short_feature_list_drops_everything_listed() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = PipelineConfig::default();
    config.train = TrainConfig::new(BoostParams { min_child_weight: 1.0, ..Default::default() })
        .with_cv(None)
        .with_max_round(5)
        .with_early_stop_round(2)
        .with_save_model_path(None);
    config.search.start = 150;
    config.search.end = 151;
    config.search.archive_dir = dir.path().to_path_buf();
    config.paths.result_dir = dir.path().join("result");

    let (x_train, x_test, y, names) = data();
    let booster = XGBoostBooster::new();
    let trainer = Trainer::new(booster);
    let predictor = Predictor::new(&booster, ResultTable::row_index(6, "orderType").unwrap());

    let report = FeatureSearch::new(&trainer, &predictor, &config.train, &config.search, &config.paths.result_dir)
        .run(&x_train, &x_test, &y, &names[..20])
        .unwrap();
    assert_eq!(report.iterations, 1);
    assert_eq!(report.archive.len(), 1);
}
