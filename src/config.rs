//! Pipeline configuration
//!
//! A single TOML document with `[train]`, `[paths]`, `[data]`, `[search]`
//! and `[logging]` sections. Every key is optional and falls back to the
//! defaults below.

use crate::error::{Result, TourboostError};
use crate::training::{ImportanceType, TrainConfig};
use crate::utils::ensure_parent;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub feature_dir: PathBuf,
    pub train_file: String,
    pub test_file: String,
    /// Directory for prediction CSVs
    pub result_dir: PathBuf,
    /// Where the feature importance table is written
    pub feature_score_path: PathBuf,
    /// Optional base table for predictions in place of the test ids
    pub future_test_path: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            feature_dir: PathBuf::from("features"),
            train_file: "train.csv".to_string(),
            test_file: "test.csv".to_string(),
            result_dir: PathBuf::from("result"),
            feature_score_path: PathBuf::from("features/xgb_feature_score.csv"),
            future_test_path: None,
        }
    }
}

/// Column roles in the feature tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub label_column: String,
    pub id_column: String,
    pub prediction_column: String,
    /// Drop this many least-important features before a single run
    pub drop_trailing: Option<usize>,
    /// Feature names ordered by importance, most important first
    pub ranked_features_path: PathBuf,
    /// Measure written to the feature score table
    pub importance_type: ImportanceType,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            label_column: "label".to_string(),
            id_column: "userid".to_string(),
            prediction_column: "orderType".to_string(),
            drop_trailing: None,
            ranked_features_path: PathBuf::from("features/lgb_features.csv"),
            importance_type: ImportanceType::Weight,
        }
    }
}

/// Feature search range and archive locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// First trailing-drop count (inclusive)
    pub start: usize,
    /// Last trailing-drop count (exclusive)
    pub end: usize,
    pub step: usize,
    /// Archive to resume from; `None` starts empty
    pub resume_archive: Option<PathBuf>,
    pub archive_dir: PathBuf,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start: 106,
            end: 150,
            step: 3,
            resume_archive: None,
            archive_dir: PathBuf::from("."),
        }
    }
}

impl SearchConfig {
    /// Trailing-drop counts visited by the search
    pub fn drop_counts(&self) -> impl Iterator<Item = usize> {
        (self.start..self.end).step_by(self.step.max(1))
    }

    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(TourboostError::invalid_param("search.step", 0, "must be at least 1"));
        }
        if self.start > self.end {
            return Err(TourboostError::invalid_param(
                "search.start",
                self.start,
                "must not exceed search.end",
            ));
        }
        Ok(())
    }
}

/// Log file settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    /// Size at which the log file is rotated
    pub max_bytes: u64,
    /// Rotated files kept next to the live one; 0 turns rotation off
    pub backups: usize,
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("log/xgb_train.log"),
            max_bytes: 1024 * 1024,
            backups: 1,
            level: "info".to_string(),
        }
    }
}

impl LogConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(TourboostError::invalid_param("logging.max_bytes", 0, "must be positive"));
        }
        Ok(())
    }
}

/// Complete configuration for one invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub train: TrainConfig,
    pub paths: PathsConfig,
    pub data: DataConfig,
    pub search: SearchConfig,
    pub logging: LogConfig,
}

impl PipelineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TourboostError::ConfigError(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.train.validate()?;
        self.search.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn train_path(&self) -> PathBuf {
        self.paths.feature_dir.join(&self.paths.train_file)
    }

    pub fn test_path(&self) -> PathBuf {
        self.paths.feature_dir.join(&self.paths.test_file)
    }
}
