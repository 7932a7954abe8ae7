//! Train/test preparation

use crate::config::{DataConfig, PipelineConfig};
use crate::error::Result;
use crate::training::{drop_shared_columns, labels_from_frame, FeatureMatrix};
use crate::utils::DataLoader;
use ndarray::Array1;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::info;

/// Aligned train and test matrices plus the labels and test identifiers
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x_train: FeatureMatrix,
    pub x_test: FeatureMatrix,
    pub y_train: Array1<f64>,
    /// Identifier column of the test table, or a `row` index when absent
    pub test_ids: DataFrame,
}

impl Dataset {
    /// Build matrices from the columns shared by both tables.
    ///
    /// Feature order follows the training table. The label and identifier
    /// columns are never features.
    pub fn from_frames(train: &DataFrame, test: &DataFrame, data: &DataConfig) -> Result<Self> {
        let test_columns: HashSet<String> = test
            .get_column_names()
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        let features: Vec<String> = train
            .get_column_names()
            .into_iter()
            .map(|c| c.to_string())
            .filter(|c| test_columns.contains(c))
            .filter(|c| *c != data.label_column && *c != data.id_column)
            .collect();

        let y_train = labels_from_frame(train, &data.label_column)?;
        let x_train = FeatureMatrix::from_frame(train, &features)?;
        let x_test = FeatureMatrix::from_frame(test, &features)?;

        let test_ids = if test_columns.contains(&data.id_column) {
            test.select([data.id_column.as_str()])?
        } else {
            let rows: Vec<u64> = (0..test.height() as u64).collect();
            DataFrame::new(vec![Series::new("row".into(), rows).into()])?
        };

        Ok(Self {
            x_train,
            x_test,
            y_train,
            test_ids,
        })
    }

    /// Load the configured feature tables
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        let (train, test) = DataLoader::new().load_features(
            &config.paths.feature_dir,
            &config.paths.train_file,
            &config.paths.test_file,
        )?;
        info!(train = ?train.shape(), test = ?test.shape(), "loaded feature tables");
        Self::from_frames(&train, &test, &config.data)
    }

    /// Drop the last `n` names of `ranked` from both matrices
    pub fn drop_trailing(&self, ranked: &[String], n: usize) -> Result<Self> {
        let tail = &ranked[ranked.len().saturating_sub(n)..];
        let (x_train, x_test) = drop_shared_columns(&self.x_train, &self.x_test, tail)?;
        Ok(Self {
            x_train,
            x_test,
            y_train: self.y_train.clone(),
            test_ids: self.test_ids.clone(),
        })
    }

    pub fn feature_names(&self) -> &[String] {
        self.x_train.names()
    }

    pub fn log_shapes(&self) {
        info!("X_train.shape={:?}, X_test.shape={:?}", self.x_train.shape(), self.x_test.shape());
    }
}
