//! Training configuration

use crate::error::{Result, TourboostError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Learning objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Logistic regression for binary classification, outputs probability
    #[serde(rename = "binary:logistic")]
    BinaryLogistic,
}

impl Default for Objective {
    fn default() -> Self {
        Objective::BinaryLogistic
    }
}

/// Evaluation metric used for early stopping and cross-validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvalMetric {
    /// Area under the ROC curve
    Auc,
    /// Negative log-likelihood
    Logloss,
    /// Binary classification error rate at threshold 0.5
    Error,
}

impl EvalMetric {
    /// Whether a larger value is better
    pub fn maximize(self) -> bool {
        matches!(self, EvalMetric::Auc)
    }

    pub fn name(self) -> &'static str {
        match self {
            EvalMetric::Auc => "auc",
            EvalMetric::Logloss => "logloss",
            EvalMetric::Error => "error",
        }
    }

    /// True if `candidate` is strictly better than `best`
    pub fn improves(self, candidate: f64, best: f64) -> bool {
        if self.maximize() {
            candidate > best
        } else {
            candidate < best
        }
    }
}

impl fmt::Display for EvalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EvalMetric {
    type Err = TourboostError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auc" => Ok(EvalMetric::Auc),
            "logloss" => Ok(EvalMetric::Logloss),
            "error" => Ok(EvalMetric::Error),
            other => Err(TourboostError::invalid_param(
                "eval_metric",
                other,
                "expected one of auc, logloss, error",
            )),
        }
    }
}

/// Booster hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostParams {
    /// Shrinkage applied to each tree's leaf weights
    pub learning_rate: f64,
    pub eval_metric: EvalMetric,
    /// Kept for parity with sklearn-style configs; `max_round` bounds training
    pub n_estimators: usize,
    pub max_depth: usize,
    /// Minimum hessian sum required in each child
    pub min_child_weight: f64,
    /// Minimum loss reduction to make a split
    pub gamma: f64,
    pub subsample: f64,
    pub colsample_bytree: f64,
    /// L2 regularization on leaf weights
    pub reg_lambda: f64,
    /// L1 regularization on leaf weights
    pub reg_alpha: f64,
    /// Suppresses per-round evaluation logging
    pub silent: bool,
    pub objective: Objective,
    /// Weight applied to gradients of positive samples
    pub scale_pos_weight: f64,
}

impl Default for BoostParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            eval_metric: EvalMetric::Auc,
            n_estimators: 5000,
            max_depth: 6,
            min_child_weight: 7.0,
            gamma: 0.0,
            subsample: 0.8,
            colsample_bytree: 0.6,
            reg_lambda: 1.0,
            reg_alpha: 0.0,
            silent: true,
            objective: Objective::BinaryLogistic,
            scale_pos_weight: 1.0,
        }
    }
}

impl BoostParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0) {
            return Err(TourboostError::invalid_param(
                "learning_rate",
                self.learning_rate,
                "must be positive",
            ));
        }
        for (name, ratio) in [("subsample", self.subsample), ("colsample_bytree", self.colsample_bytree)] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(TourboostError::invalid_param(name, ratio, "must be in (0, 1]"));
            }
        }
        if self.min_child_weight < 0.0 || self.gamma < 0.0 || self.reg_lambda < 0.0 || self.reg_alpha < 0.0 {
            return Err(TourboostError::ConfigError(
                "min_child_weight, gamma, reg_lambda and reg_alpha must be non-negative".to_string(),
            ));
        }
        if !(self.scale_pos_weight > 0.0) {
            return Err(TourboostError::invalid_param(
                "scale_pos_weight",
                self.scale_pos_weight,
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Run-level training configuration: booster parameters plus iteration and
/// validation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub params: BoostParams,
    /// Upper bound on boosting rounds
    pub max_round: usize,
    /// Number of CV folds; `None` trains on a single 80/20 split.
    /// Serialized as an integer where 0 means `None`.
    #[serde(with = "fold_count")]
    pub cv_folds: Option<usize>,
    /// Rounds without improvement before stopping
    pub early_stop_round: usize,
    pub seed: u64,
    /// Preserve class balance within CV folds
    pub stratified: bool,
    pub save_model_path: Option<PathBuf>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            params: BoostParams::default(),
            max_round: 3000,
            cv_folds: Some(10),
            early_stop_round: 50,
            seed: 3,
            stratified: false,
            save_model_path: Some(PathBuf::from("model/xgb.dat")),
        }
    }
}

impl TrainConfig {
    pub fn new(params: BoostParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Builder method to set max boosting rounds
    pub fn with_max_round(mut self, rounds: usize) -> Self {
        self.max_round = rounds;
        self
    }

    /// Builder method to set CV folds (`None` for split-based training)
    pub fn with_cv(mut self, folds: Option<usize>) -> Self {
        self.cv_folds = folds;
        self
    }

    pub fn with_early_stop_round(mut self, rounds: usize) -> Self {
        self.early_stop_round = rounds;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_stratified(mut self, stratified: bool) -> Self {
        self.stratified = stratified;
        self
    }

    pub fn with_save_model_path(mut self, path: Option<PathBuf>) -> Self {
        self.save_model_path = path;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.max_round == 0 {
            return Err(TourboostError::invalid_param("max_round", 0, "must be at least 1"));
        }
        if let Some(folds) = self.cv_folds {
            if folds < 2 {
                return Err(TourboostError::invalid_param("cv_folds", folds, "must be at least 2"));
            }
        }
        Ok(())
    }
}

mod fold_count {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(folds: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(folds.unwrap_or(0) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        let folds = usize::deserialize(deserializer)?;
        Ok((folds > 0).then_some(folds))
    }
}
