//! Model training module
//!
//! Provides:
//! - Booster hyperparameters and run configuration
//! - Named feature matrices and labelled data handles
//! - The [`Booster`] backend trait with a native XGBoost-style implementation
//! - K-fold and hold-out splitting
//! - [`Trainer`], which picks the best round count by CV or early stopping

mod config;
mod matrix;
mod trainer;
pub mod booster;
pub mod cross_validation;
pub mod metrics;
pub mod xgboost;

pub use booster::{BoostedModel, Booster, CvOptions, CvRecord, CvTable, ImportanceType};
pub use config::{BoostParams, EvalMetric, Objective, TrainConfig};
pub use cross_validation::{train_test_split, CVSplit, CVStrategy, CrossValidator};
pub use matrix::{drop_shared_columns, labels_from_frame, DMatrix, FeatureMatrix};
pub use trainer::{FitOutcome, Trainer, SPLIT_SEED, VALIDATION_SIZE};
pub use xgboost::{XGBoostBooster, XGBoostModel};
