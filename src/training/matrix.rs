//! Dense feature matrices and the labelled data handle passed to boosters

use crate::error::{Result, TourboostError};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use std::collections::HashSet;

/// Named, row-major feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(TourboostError::ShapeError {
                expected: format!("{} columns", names.len()),
                actual: format!("{} columns", values.ncols()),
            });
        }
        let mut seen = HashSet::with_capacity(names.len());
        if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(TourboostError::DataError(format!("duplicate feature column '{}'", dup)));
        }
        Ok(Self { names, values })
    }

    /// Extract the named columns from a DataFrame, casting to f64.
    /// Nulls, NaN and values that cannot be cast become 0.0.
    pub fn from_frame(df: &DataFrame, columns: &[String]) -> Result<Self> {
        let n_rows = df.height();

        let col_data: Vec<Vec<f64>> = columns
            .iter()
            .map(|name| {
                let column = df
                    .column(name)
                    .map_err(|_| TourboostError::FeatureNotFound(name.clone()))?;
                let as_f64 = column.cast(&DataType::Float64)?;
                let values: Vec<f64> = as_f64
                    .f64()?
                    .into_iter()
                    .map(|v| v.filter(|x| !x.is_nan()).unwrap_or(0.0))
                    .collect();
                Ok(values)
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
        let values = Array2::from_shape_fn((n_rows, columns.len()), |(r, c)| col_refs[c][r]);
        Self::new(columns.to_vec(), values)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Copy of this matrix without the given columns. Unknown names are ignored.
    pub fn drop_columns(&self, columns: &[String]) -> Self {
        let drop: HashSet<&str> = columns.iter().map(String::as_str).collect();
        let keep: Vec<usize> = self
            .names
            .iter()
            .enumerate()
            .filter(|(_, n)| !drop.contains(n.as_str()))
            .map(|(i, _)| i)
            .collect();

        if keep.len() == self.names.len() {
            return self.clone();
        }

        Self {
            names: keep.iter().map(|&i| self.names[i].clone()).collect(),
            values: self.values.select(Axis(1), &keep),
        }
    }

    /// Copy of the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            values: self.values.select(Axis(0), indices),
        }
    }
}

/// Drop `columns` from both matrices.
///
/// Every column must be present in both matrices or in neither; columns
/// absent from both are skipped.
pub fn drop_shared_columns(
    train: &FeatureMatrix,
    test: &FeatureMatrix,
    columns: &[String],
) -> Result<(FeatureMatrix, FeatureMatrix)> {
    for name in columns {
        if train.contains(name) != test.contains(name) {
            return Err(TourboostError::DataError(format!(
                "column '{}' is present in only one of train/test",
                name
            )));
        }
    }
    Ok((train.drop_columns(columns), test.drop_columns(columns)))
}

/// Read a binary label column as 0.0/1.0 values
pub fn labels_from_frame(df: &DataFrame, label: &str) -> Result<Array1<f64>> {
    let column = df
        .column(label)
        .map_err(|_| TourboostError::FeatureNotFound(label.to_string()))?;
    let as_f64 = column.cast(&DataType::Float64)?;

    let mut labels = Vec::with_capacity(df.height());
    for (row, value) in as_f64.f64()?.into_iter().enumerate() {
        match value {
            Some(v) if v == 0.0 || v == 1.0 => labels.push(v),
            Some(v) => {
                return Err(TourboostError::DataError(format!(
                    "label '{}' row {} is {}, expected 0 or 1",
                    label, row, v
                )))
            }
            None => {
                return Err(TourboostError::DataError(format!(
                    "label '{}' row {} is null",
                    label, row
                )))
            }
        }
    }
    Ok(Array1::from_vec(labels))
}

/// Feature matrix with optional labels, the unit of data handed to a booster
#[derive(Debug, Clone)]
pub struct DMatrix {
    data: FeatureMatrix,
    label: Option<Array1<f64>>,
}

impl DMatrix {
    pub fn new(data: FeatureMatrix) -> Self {
        Self { data, label: None }
    }

    pub fn with_label(data: FeatureMatrix, label: Array1<f64>) -> Result<Self> {
        if data.nrows() != label.len() {
            return Err(TourboostError::ShapeError {
                expected: format!("{} labels", data.nrows()),
                actual: format!("{} labels", label.len()),
            });
        }
        Ok(Self { data, label: Some(label) })
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.data
    }

    pub fn label(&self) -> Option<&Array1<f64>> {
        self.label.as_ref()
    }

    pub fn num_row(&self) -> usize {
        self.data.nrows()
    }

    /// Subset of rows, labels included
    pub fn slice(&self, indices: &[usize]) -> Self {
        Self {
            data: self.data.select_rows(indices),
            label: self.label.as_ref().map(|y| y.select(Axis(0), indices)),
        }
    }
}
