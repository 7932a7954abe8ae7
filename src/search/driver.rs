//! Trailing-feature search

use super::archive::SearchArchive;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::inference::Predictor;
use crate::training::{drop_shared_columns, Booster, FeatureMatrix, TrainConfig, Trainer};
use crate::utils::timestamp;
use ndarray::Array1;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Outcome of a feature search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Where the combined archive was written
    pub archive_path: PathBuf,
    /// Resumed entries followed by this run's entries
    pub archive: SearchArchive,
    /// Iterations run in this invocation
    pub iterations: usize,
    pub best_auc: Option<f64>,
}

/// Retrains with increasing numbers of the least important features removed
pub struct FeatureSearch<'a, B: Booster> {
    trainer: &'a Trainer<B>,
    predictor: &'a Predictor<'a, B>,
    train_config: &'a TrainConfig,
    search: &'a SearchConfig,
    result_dir: &'a Path,
}

impl<'a, B: Booster> FeatureSearch<'a, B> {
    pub fn new(
        trainer: &'a Trainer<B>,
        predictor: &'a Predictor<'a, B>,
        train_config: &'a TrainConfig,
        search: &'a SearchConfig,
        result_dir: &'a Path,
    ) -> Self {
        Self {
            trainer,
            predictor,
            train_config,
            search,
            result_dir,
        }
    }

    /// Run the search.
    ///
    /// `feature_names` is ordered most important first; iteration `n` drops
    /// its last `n` names from both matrices. Results are appended to the
    /// configured resume archive (or an empty one) and saved under a
    /// timestamped name.
    pub fn run(
        &self,
        x_train: &FeatureMatrix,
        x_test: &FeatureMatrix,
        y_train: &Array1<f64>,
        feature_names: &[String],
    ) -> Result<SearchReport> {
        self.search.validate()?;
        let mut archive = match &self.search.resume_archive {
            Some(path) => {
                let resumed = SearchArchive::load(path)?;
                info!(path = %path.display(), entries = resumed.len(), "resuming feature search");
                resumed
            }
            None => SearchArchive::new(),
        };

        let tic = Instant::now();
        let mut iterations = 0;
        for n_drop in self.search.drop_counts() {
            let tail = &feature_names[feature_names.len().saturating_sub(n_drop)..];
            let (x_train_, x_test_) = drop_shared_columns(x_train, x_test, tail)?;
            info!("X_train.shape={:?}, X_test.shape={:?}", x_train_.shape(), x_test_.shape());

            let outcome = self.trainer.fit(self.train_config, &x_train_, y_train)?;
            info!("Time cost {:.3}s", tic.elapsed().as_secs_f64());
            info!("best_round={}, best_auc={}", outcome.best_round, outcome.best_score);

            let result_path = self
                .result_dir
                .join(format!("result_xgb_search_feat_{}-{:.4}.csv", n_drop, outcome.best_score));
            let y_pred = self.predictor.predict(&outcome.model, &x_test_, Some(&result_path))?;
            archive.push(y_pred.map(|p| p.to_vec()), outcome.best_score);
            iterations += 1;
        }

        let archive_path = self
            .search
            .archive_dir
            .join(format!("xgb_feat_search_pred_{}.zip", timestamp()));
        archive.save(&archive_path)?;

        let best_auc = archive.best_auc();
        match best_auc {
            Some(auc) => info!("Saved y_preds to {}. Best auc is {}", archive_path.display(), auc),
            None => info!("Saved y_preds to {}. No iterations recorded", archive_path.display()),
        }

        Ok(SearchReport {
            archive_path,
            archive,
            iterations,
            best_auc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::ResultTable;
    use crate::training::{BoostParams, XGBoostBooster};
    use ndarray::Array2;

    fn matrices(n_features: usize) -> (FeatureMatrix, FeatureMatrix, Array1<f64>, Vec<String>) {
        let names: Vec<String> = (0..n_features).map(|j| format!("f{}", j)).collect();
        let train = Array2::from_shape_fn((16, n_features), |(i, j)| ((i + j) % 5) as f64 + (i % 2) as f64);
        let test = Array2::from_shape_fn((4, n_features), |(i, j)| ((i * j) % 3) as f64);
        let y = Array1::from_shape_fn(16, |i| (i % 2) as f64);
        (
            FeatureMatrix::new(names.clone(), train).unwrap(),
            FeatureMatrix::new(names.clone(), test).unwrap(),
            y,
            names,
        )
    }

    #[test]
    fn test_search_appends_to_resumed_archive() {
        let dir = tempfile::tempdir().unwrap();
        let resume = dir.path().join("prev.zip");
        let mut previous = SearchArchive::new();
        previous.push(None, 0.99);
        previous.save(&resume).unwrap();

        let (x_train, x_test, y, names) = matrices(8);
        let train_config = TrainConfig::new(BoostParams { min_child_weight: 0.0, ..Default::default() })
            .with_cv(None)
            .with_max_round(5)
            .with_early_stop_round(2)
            .with_save_model_path(None);
        let search = SearchConfig {
            start: 1,
            end: 6,
            step: 2,
            resume_archive: Some(resume),
            archive_dir: dir.path().join("archives"),
        };
        let result_dir = dir.path().join("result");

        let booster = XGBoostBooster;
        let trainer = Trainer::new(booster);
        let predictor = Predictor::new(&booster, ResultTable::row_index(4, "orderType").unwrap());
        let report = FeatureSearch::new(&trainer, &predictor, &train_config, &search, &result_dir)
            .run(&x_train, &x_test, &y, &names)
            .unwrap();

        assert_eq!(report.iterations, 3);
        assert_eq!(report.archive.len(), 4);
        assert_eq!(report.best_auc, Some(0.99));
        assert!(report.archive.y_pred_list[1..].iter().all(|p| p.as_ref().map(Vec::len) == Some(4)));
        assert_eq!(std::fs::read_dir(&result_dir).unwrap().count(), 3);
        assert_eq!(SearchArchive::load(&report.archive_path).unwrap(), report.archive);
    }
}
