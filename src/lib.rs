//! Tourboost - gradient boosted order-type prediction
//!
//! This crate trains a binary XGBoost-style classifier on tourism user
//! features and predicts the probability that a user places a premium
//! order. It includes:
//! - Cross-validated or hold-out training with early stopping
//! - Prediction that reports scoring failures instead of aborting
//! - Feature importance reports
//! - A feature search that drops the least important trailing features
//!
//! # Modules
//!
//! ## Core
//! - [`training`] - Boosting backend, metrics, CV splits and the trainer
//! - [`inference`] - Prediction and result files
//! - [`explainability`] - Feature importance tables
//!
//! ## Drivers
//! - [`pipeline`] - Dataset preparation and the single-run driver
//! - [`search`] - Feature search and its result archive
//!
//! ## Infrastructure
//! - [`config`] - TOML pipeline configuration
//! - [`logging`] - stdout and rotating-file tracing output
//! - [`cli`] - Command-line interface
//! - [`utils`] - Table loading and saving

// Core error handling
pub mod error;

// Core ML modules
pub mod training;
pub mod inference;
pub mod explainability;

// Drivers
pub mod pipeline;
pub mod search;

// Infrastructure
pub mod config;
pub mod logging;
pub mod utils;

// Services
pub mod cli;

pub use error::{TourboostError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{TourboostError, Result};

    // Configuration
    pub use crate::config::{DataConfig, LogConfig, PathsConfig, PipelineConfig, SearchConfig};

    // Training
    pub use crate::training::{
        BoostParams, BoostedModel, Booster, DMatrix, EvalMetric, FeatureMatrix, FitOutcome,
        ImportanceType, TrainConfig, Trainer, XGBoostBooster, XGBoostModel,
    };

    // Inference
    pub use crate::inference::{Predictor, ResultTable};

    // Explainability
    pub use crate::explainability::{load_ranked_features, FeatureAnalyzer};

    // Drivers
    pub use crate::pipeline::{Dataset, Pipeline, RunReport};
    pub use crate::search::{FeatureSearch, SearchArchive, SearchReport};
}
