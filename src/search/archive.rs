//! Persisted feature-search results
//!
//! A deflate zip with two JSON entries: `y_pred_list.json` (one prediction
//! vector per iteration, `null` where prediction failed) and `aucs.json`.

use crate::error::{Result, TourboostError};
use crate::utils::ensure_parent;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

const PREDICTIONS_ENTRY: &str = "y_pred_list.json";
const AUCS_ENTRY: &str = "aucs.json";

/// Prediction vectors and validation metrics accumulated across searches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchArchive {
    pub y_pred_list: Vec<Option<Vec<f64>>>,
    pub aucs: Vec<f64>,
}

impl SearchArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.y_pred_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_pred_list.is_empty()
    }

    pub fn push(&mut self, y_pred: Option<Vec<f64>>, auc: f64) {
        self.y_pred_list.push(y_pred);
        self.aucs.push(auc);
    }

    /// Append every entry of `other`
    /// Highest metric recorded, `None` when empty
    pub fn best_auc(&self) -> Option<f64> {
        self.aucs.iter().copied().reduce(f64::max)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            TourboostError::SerializationError(format!("{}: {}", path.display(), e))
        })?;
        let mut zip = zip::ZipArchive::new(BufReader::new(file))?;

        let y_pred_list = serde_json::from_reader(zip.by_name(PREDICTIONS_ENTRY)?)?;
        let aucs = serde_json::from_reader(zip.by_name(AUCS_ENTRY)?)?;
        Ok(Self { y_pred_list, aucs })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let file = File::create(path)?;
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(PREDICTIONS_ENTRY, options)?;
        zip.write_all(&serde_json::to_vec(&self.y_pred_list)?)?;
        zip.start_file(AUCS_ENTRY, options)?;
        zip.write_all(&serde_json::to_vec(&self.aucs)?)?;
        zip.finish()?;
        Ok(())
    }
}
