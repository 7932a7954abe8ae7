//! Model fitting with cross-validated or hold-out early stopping

use super::booster::{BoostedModel, Booster, CvOptions, CvTable};
use super::config::TrainConfig;
use super::cross_validation::train_test_split;
use super::matrix::{DMatrix, FeatureMatrix};
use crate::error::{Result, TourboostError};
use ndarray::Array1;
use std::time::Instant;
use tracing::{debug, info};

/// Share of rows held out for validation when no CV folds are configured
pub const VALIDATION_SIZE: f64 = 0.2;
/// Seed for the hold-out split, independent of the booster seed
pub const SPLIT_SEED: u64 = 100;

/// Result of one training invocation
#[derive(Debug, Clone)]
pub struct FitOutcome<M> {
    pub model: M,
    /// Best validation metric (mean test metric under CV)
    pub best_score: f64,
    /// Best boosting round count
    pub best_round: usize,
    /// Per-round CV history; `None` for split-based training
    pub cv_result: Option<CvTable>,
}

/// Fits a booster according to a [`TrainConfig`]
#[derive(Debug, Clone, Default)]
pub struct Trainer<B> {
    booster: B,
}

impl<B: Booster> Trainer<B> {
    pub fn new(booster: B) -> Self {
        Self { booster }
    }

    pub fn booster(&self) -> &B {
        &self.booster
    }

    /// Train a model and return it with its best round and metric.
    ///
    /// With `cv_folds` set, k-fold CV picks the round count and a final model
    /// is fit on all rows for that many rounds. Otherwise 20% of rows are held
    /// out and training stops early against them.
    pub fn fit(&self, config: &TrainConfig, x: &FeatureMatrix, y: &Array1<f64>) -> Result<FitOutcome<B::Model>> {
        config.validate()?;
        let start = Instant::now();
        let params = &config.params;

        let outcome = match config.cv_folds {
            Some(nfold) => {
                let dtrain = DMatrix::with_label(x.clone(), y.clone())?;
                let options = CvOptions {
                    nfold,
                    seed: config.seed,
                    stratified: config.stratified,
                    early_stopping_rounds: Some(config.early_stop_round),
                };
                let cv_result = self.booster.cv(params, &dtrain, config.max_round, &options)?;

                let best_round = cv_result.n_rows();
                let best_score = cv_result.last_test_mean().ok_or_else(|| {
                    TourboostError::TrainingError("cross-validation produced no rounds".to_string())
                })?;
                debug!(nfold, best_round, best_score, "cross-validation finished");

                let model = self.booster.train(params, &dtrain, best_round, &[], None, config.seed)?;
                FitOutcome {
                    model,
                    best_score,
                    best_round,
                    cv_result: Some(cv_result),
                }
            }
            None => {
                let (train_idx, valid_idx) = train_test_split(x.nrows(), VALIDATION_SIZE, SPLIT_SEED)?;
                let full = DMatrix::with_label(x.clone(), y.clone())?;
                let dtrain = full.slice(&train_idx);
                let dvalid = full.slice(&valid_idx);

                let model = self.booster.train(
                    params,
                    &dtrain,
                    config.max_round,
                    &[(&dtrain, "train"), (&dvalid, "valid")],
                    Some(config.early_stop_round),
                    config.seed,
                )?;

                let best_round = model.best_iteration().ok_or_else(|| {
                    TourboostError::TrainingError("model has no best iteration".to_string())
                })?;
                let best_score = model.best_score().ok_or_else(|| {
                    TourboostError::TrainingError("model has no best score".to_string())
                })?;
                FitOutcome {
                    model,
                    best_score,
                    best_round,
                    cv_result: None,
                }
            }
        };

        if let Some(path) = &config.save_model_path {
            outcome.model.save(path)?;
            info!(path = %path.display(), "saved model");
        }

        debug!(elapsed_secs = start.elapsed().as_secs_f64(), "fit finished");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::config::BoostParams;
    use crate::training::xgboost::{XGBoostBooster, XGBoostModel};
    use ndarray::Array2;

    fn data(n: usize) -> (FeatureMatrix, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| if j == 0 { i as f64 } else { ((i * 31) % 17) as f64 });
        let y = Array1::from_shape_fn(n, |i| if i >= n / 2 { 1.0 } else { 0.0 });
        (FeatureMatrix::new(vec!["f1".into(), "f2".into()], x).unwrap(), y)
    }

    fn config() -> TrainConfig {
        TrainConfig::new(BoostParams {
            learning_rate: 0.3,
            min_child_weight: 1.0,
            ..Default::default()
        })
        .with_max_round(40)
        .with_early_stop_round(5)
        .with_save_model_path(None)
    }

    #[test]
    fn test_cv_branch_best_round_is_table_rows() {
        let (x, y) = data(40);
        let trainer = Trainer::new(XGBoostBooster);
        let outcome = trainer.fit(&config().with_cv(Some(4)), &x, &y).unwrap();

        let table = outcome.cv_result.as_ref().unwrap();
        assert_eq!(outcome.best_round, table.n_rows());
        assert_eq!(outcome.best_score, table.last_test_mean().unwrap());
        assert_eq!(outcome.model.num_trees(), outcome.best_round);
    }

    #[test]
    fn test_split_branch_uses_model_best() {
        let (x, y) = data(50);
        let trainer = Trainer::new(XGBoostBooster);
        let outcome = trainer.fit(&config().with_cv(None), &x, &y).unwrap();

        assert!(outcome.cv_result.is_none());
        assert_eq!(Some(outcome.best_round), outcome.model.best_iteration());
        assert_eq!(Some(outcome.best_score), outcome.model.best_score());
    }

    #[test]
    fn test_saves_model_when_path_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model/xgb.dat");
        let (x, y) = data(30);

        let cfg = config().with_cv(None).with_save_model_path(Some(path.clone()));
        let outcome = Trainer::new(XGBoostBooster).fit(&cfg, &x, &y).unwrap();

        let loaded = XGBoostModel::load(&path).unwrap();
        assert_eq!(loaded.num_trees(), outcome.model.num_trees());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let (x, y) = data(10);
        let cfg = config().with_cv(Some(1));
        assert!(Trainer::new(XGBoostBooster).fit(&cfg, &x, &y).is_err());
    }
}
