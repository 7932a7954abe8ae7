//! Single-run and feature-search drivers

use super::dataset::Dataset;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::explainability::{load_ranked_features, FeatureAnalyzer};
use crate::inference::{Predictor, ResultTable};
use crate::search::{FeatureSearch, SearchReport};
use crate::training::{Booster, Trainer};
use crate::utils::{timestamp, DataLoader};
use ndarray::Array1;
use polars::prelude::DataFrame;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of [`Pipeline::run_cv`]
#[derive(Debug)]
pub struct RunReport<M> {
    pub model: M,
    pub best_round: usize,
    pub best_score: f64,
    /// Result file, `None` when prediction failed
    pub result_path: Option<PathBuf>,
    pub predictions: Option<Array1<f64>>,
    pub feature_scores: DataFrame,
    pub elapsed: Duration,
}

/// Runs the configured drivers with one booster
pub struct Pipeline<B> {
    config: PipelineConfig,
    trainer: Trainer<B>,
}

impl<B: Booster> Pipeline<B> {
    pub fn new(config: PipelineConfig, booster: B) -> Self {
        Self {
            config,
            trainer: Trainer::new(booster),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn trainer(&self) -> &Trainer<B> {
        &self.trainer
    }

    /// Load the feature tables and log the matrix shapes
    pub fn load_dataset(&self) -> Result<Dataset> {
        let dataset = Dataset::load(&self.config)?;
        dataset.log_shapes();
        Ok(dataset)
    }

    /// Apply `data.drop_trailing` using the ranked feature list, if set
    pub fn prune(&self, dataset: Dataset) -> Result<Dataset> {
        match self.config.data.drop_trailing {
            Some(n) => {
                let ranked = load_ranked_features(&self.config.data.ranked_features_path)?;
                let pruned = dataset.drop_trailing(&ranked, n)?;
                info!(dropped = n, "pruned trailing features");
                pruned.log_shapes();
                Ok(pruned)
            }
            None => Ok(dataset),
        }
    }

    /// Table predictions are written into: the configured future-test table,
    /// or the test identifiers
    pub fn result_table(&self, dataset: &Dataset) -> Result<ResultTable> {
        let column = self.config.data.prediction_column.as_str();
        match &self.config.paths.future_test_path {
            Some(path) => Ok(ResultTable::new(DataLoader::new().load_auto(path)?, column)),
            None => Ok(ResultTable::new(dataset.test_ids.clone(), column)),
        }
    }

    /// Train once on all features, write predictions and the feature
    /// importance table
    pub fn run_cv(&self, dataset: &Dataset) -> Result<RunReport<B::Model>> {
        let tic = Instant::now();
        dataset.log_shapes();

        let outcome = self.trainer.fit(&self.config.train, &dataset.x_train, &dataset.y_train)?;
        info!("Time cost {:.3}s", tic.elapsed().as_secs_f64());
        info!("best_round={}, best_auc={}", outcome.best_round, outcome.best_score);

        let result_path = self
            .config
            .paths
            .result_dir
            .join(format!("result_xgb_{}-{:.4}.csv", timestamp(), outcome.best_score));
        let predictor = Predictor::new(self.trainer.booster(), self.result_table(dataset)?);
        let predictions = predictor.predict(&outcome.model, &dataset.x_test, Some(&result_path))?;

        let feature_scores = FeatureAnalyzer::new(self.config.data.importance_type)
            .analyze(&outcome.model, &self.config.paths.feature_score_path)?;

        Ok(RunReport {
            result_path: predictions.as_ref().map(|_| result_path),
            predictions,
            feature_scores,
            best_round: outcome.best_round,
            best_score: outcome.best_score,
            model: outcome.model,
            elapsed: tic.elapsed(),
        })
    }

    /// Feature search over `feature_names`, ordered most important first
    pub fn run_feat_search(&self, dataset: &Dataset, feature_names: &[String]) -> Result<SearchReport> {
        let predictor = Predictor::new(self.trainer.booster(), self.result_table(dataset)?);
        FeatureSearch::new(
            &self.trainer,
            &predictor,
            &self.config.train,
            &self.config.search,
            &self.config.paths.result_dir,
        )
        .run(&dataset.x_train, &dataset.x_test, &dataset.y_train, feature_names)
    }

    /// Score the test matrix with an already trained model
    pub fn predict(&self, model: &B::Model, dataset: &Dataset, output: &Path) -> Result<Option<Array1<f64>>> {
        let predictor = Predictor::new(self.trainer.booster(), self.result_table(dataset)?);
        predictor.predict(model, &dataset.x_test, Some(output))
    }
}
