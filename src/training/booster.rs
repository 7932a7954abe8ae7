//! Boosting backend interface
//!
//! The pipeline only talks to gradient boosting through [`Booster`], so the
//! trainer, predictor and feature search never depend on tree internals.

use super::config::{BoostParams, EvalMetric};
use super::matrix::DMatrix;
use crate::error::Result;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How feature importance is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportanceType {
    /// Number of times a feature is used to split
    #[default]
    Weight,
    /// Total loss reduction from splits on a feature
    Gain,
}

/// A trained boosting model
pub trait BoostedModel {
    /// 0-based index of the best round seen during early stopping
    fn best_iteration(&self) -> Option<usize>;

    /// Metric value at `best_iteration`
    fn best_score(&self) -> Option<f64>;

    fn num_trees(&self) -> usize;

    /// Feature names the model was trained on, in column order
    fn feature_names(&self) -> &[String];

    /// Per-feature importance, one entry per training feature
    fn feature_scores(&self, kind: ImportanceType) -> Vec<(String, f64)>;

    /// Serialize the model to `path`
    fn save(&self, path: &Path) -> Result<()>;
}

/// Cross-validation options
#[derive(Debug, Clone)]
pub struct CvOptions {
    pub nfold: usize,
    pub seed: u64,
    pub stratified: bool,
    pub early_stopping_rounds: Option<usize>,
}

/// Per-round cross-validation metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvRecord {
    pub train_mean: f64,
    pub train_std: f64,
    pub test_mean: f64,
    pub test_std: f64,
}

/// Cross-validation history, one row per boosting round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvTable {
    pub metric: EvalMetric,
    pub rows: Vec<CvRecord>,
}

impl CvTable {
    pub fn new(metric: EvalMetric) -> Self {
        Self { metric, rows: Vec::new() }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean test metric of the final round
    pub fn last_test_mean(&self) -> Option<f64> {
        self.rows.last().map(|r| r.test_mean)
    }

    /// Column names in the `train-auc-mean` style
    pub fn column_names(&self) -> [String; 4] {
        let m = self.metric.name();
        [
            format!("train-{}-mean", m),
            format!("train-{}-std", m),
            format!("test-{}-mean", m),
            format!("test-{}-std", m),
        ]
    }
}

/// Gradient boosting library seam
pub trait Booster {
    type Model: BoostedModel;

    /// Train for up to `num_boost_round` rounds.
    ///
    /// With `early_stopping_rounds`, the last entry of `evals` is watched and
    /// training halts once that many rounds pass without improvement.
    fn train(
        &self,
        params: &BoostParams,
        dtrain: &DMatrix,
        num_boost_round: usize,
        evals: &[(&DMatrix, &str)],
        early_stopping_rounds: Option<usize>,
        seed: u64,
    ) -> Result<Self::Model>;

    /// K-fold cross-validation; the table is truncated to the best round
    fn cv(
        &self,
        params: &BoostParams,
        dtrain: &DMatrix,
        num_boost_round: usize,
        options: &CvOptions,
    ) -> Result<CvTable>;

    /// Positive-class probabilities for every row of `data`
    fn predict(&self, model: &Self::Model, data: &DMatrix) -> Result<Array1<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cv_table_columns() {
        let mut table = CvTable::new(EvalMetric::Auc);
        assert!(table.is_empty());
        assert_eq!(table.last_test_mean(), None);

        table.rows.push(CvRecord { train_mean: 0.9, train_std: 0.0, test_mean: 0.8, test_std: 0.01 });
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.last_test_mean(), Some(0.8));
        assert_eq!(table.column_names()[2], "test-auc-mean");
    }
}
