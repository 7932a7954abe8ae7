//! Prediction with failure capture and result-file output

use crate::error::{Result, TourboostError};
use crate::training::{Booster, DMatrix, FeatureMatrix};
use crate::utils::DataSaver;
use ndarray::Array1;
use polars::prelude::*;
use std::path::Path;
use tracing::{error, info};

pub const DEFAULT_PREDICTION_COLUMN: &str = "orderType";

/// Base table that predictions are merged into before writing
#[derive(Debug, Clone)]
pub struct ResultTable {
    base: DataFrame,
    prediction_column: String,
}

impl ResultTable {
    pub fn new(base: DataFrame, prediction_column: impl Into<String>) -> Self {
        Self {
            base,
            prediction_column: prediction_column.into(),
        }
    }

    /// Base table holding only a `row` index column
    pub fn row_index(n_rows: usize, prediction_column: impl Into<String>) -> Result<Self> {
        let rows: Vec<u64> = (0..n_rows as u64).collect();
        let base = DataFrame::new(vec![Series::new("row".into(), rows).into()])?;
        Ok(Self::new(base, prediction_column))
    }

    pub fn height(&self) -> usize {
        self.base.height()
    }

    /// Base table with the prediction column set to `predictions`
    pub fn merge(&self, predictions: &Array1<f64>) -> Result<DataFrame> {
        if predictions.len() != self.base.height() {
            return Err(TourboostError::ShapeError {
                expected: format!("{} predictions", self.base.height()),
                actual: format!("{} predictions", predictions.len()),
            });
        }
        let mut df = self.base.clone();
        let column = Series::new(self.prediction_column.as_str().into(), predictions.to_vec());
        df.with_column(column)?;
        Ok(df)
    }

    /// Merge predictions and write the table as CSV
    pub fn write(&self, predictions: &Array1<f64>, path: &Path) -> Result<()> {
        let mut df = self.merge(predictions)?;
        DataSaver::save_csv(&mut df, path)
    }
}

/// Scores feature matrices with a trained model
pub struct Predictor<'a, B> {
    booster: &'a B,
    results: ResultTable,
}

impl<'a, B: Booster> Predictor<'a, B> {
    pub fn new(booster: &'a B, results: ResultTable) -> Self {
        Self { booster, results }
    }

    pub fn result_table(&self) -> &ResultTable {
        &self.results
    }

    /// Predict probabilities for `x`.
    ///
    /// A scoring failure is logged as an error and yields `Ok(None)`. When
    /// `save_result_path` is set the predictions are written there; write
    /// failures are returned as errors.
    pub fn predict(
        &self,
        model: &B::Model,
        x: &FeatureMatrix,
        save_result_path: Option<&Path>,
    ) -> Result<Option<Array1<f64>>> {
        let dtest = DMatrix::new(x.clone());
        let y_pred = match self.booster.predict(model, &dtest) {
            Ok(pred) => pred,
            Err(e) => {
                let (rows, cols) = x.shape();
                error!(error = %e, rows, cols, "prediction failed");
                return Ok(None);
            }
        };

        if let Some(path) = save_result_path {
            self.results.write(&y_pred, path)?;
            info!(path = %path.display(), rows = y_pred.len(), "saved predictions");
        }

        Ok(Some(y_pred))
    }
}
