//! Error types for the tourboost pipeline

use thiserror::Error;

/// Result type alias for tourboost operations
pub type Result<T> = std::result::Result<T, TourboostError>;

/// Main error type for the pipeline
#[derive(Error, Debug)]
pub enum TourboostError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Feature mismatch: model trained on [{expected}], data has [{actual}]")]
    FeatureMismatch { expected: String, actual: String },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },
}

impl TourboostError {
    pub(crate) fn invalid_param(name: &str, value: impl ToString, reason: &str) -> Self {
        TourboostError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<polars::error::PolarsError> for TourboostError {
    fn from(err: polars::error::PolarsError) -> Self {
        TourboostError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for TourboostError {
    fn from(err: serde_json::Error) -> Self {
        TourboostError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for TourboostError {
    fn from(err: bincode::Error) -> Self {
        TourboostError::SerializationError(err.to_string())
    }
}

impl From<toml::de::Error> for TourboostError {
    fn from(err: toml::de::Error) -> Self {
        TourboostError::ConfigError(err.to_string())
    }
}

impl From<toml::ser::Error> for TourboostError {
    fn from(err: toml::ser::Error) -> Self {
        TourboostError::SerializationError(err.to_string())
    }
}

impl From<zip::result::ZipError> for TourboostError {
    fn from(err: zip::result::ZipError) -> Self {
        TourboostError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for TourboostError {
    fn from(err: ndarray::ShapeError) -> Self {
        TourboostError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
