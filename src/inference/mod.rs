//! Inference module
//!
//! Scores test matrices with a trained booster and writes result tables.
//! Scoring failures are reported and surface as `None` rather than errors.

mod predictor;

pub use predictor::{Predictor, ResultTable, DEFAULT_PREDICTION_COLUMN};
