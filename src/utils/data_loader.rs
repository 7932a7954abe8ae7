//! Data loading utilities

use super::ensure_parent;
use crate::error::{Result, TourboostError};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loader for feature tables in CSV, Parquet or JSON format
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows used to infer the CSV schema
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: 1000,
        }
    }

    /// Set how many rows are scanned to infer CSV column types
    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame> {
        self.load_csv_with_options(path, b',', true)
    }

    /// Load a CSV file with specific options
    pub fn load_csv_with_options(&self, path: &Path, delimiter: u8, has_header: bool) -> Result<DataFrame> {
        let file = open(path)?;

        let parse_opts = CsvParseOptions::default().with_separator(delimiter);

        CsvReadOptions::default()
            .with_has_header(has_header)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| TourboostError::DataError(format!("{}: {}", path.display(), e)))
    }

    /// Load a Parquet file
    pub fn load_parquet(&self, path: &Path) -> Result<DataFrame> {
        let file = open(path)?;

        ParquetReader::new(file)
            .finish()
            .map_err(|e| TourboostError::DataError(format!("{}: {}", path.display(), e)))
    }

    /// Load a JSON file (line-delimited)
    pub fn load_json(&self, path: &Path) -> Result<DataFrame> {
        let file = open(path)?;

        JsonReader::new(file)
            .with_json_format(JsonFormat::JsonLines)
            .finish()
            .map_err(|e| TourboostError::DataError(format!("{}: {}", path.display(), e)))
    }

    /// Detect file format from extension and load
    pub fn load_auto(&self, path: &Path) -> Result<DataFrame> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let df = match ext.as_str() {
            "tsv" => self.load_csv_with_options(path, b'\t', true)?,
            "parquet" | "pq" => self.load_parquet(path)?,
            "json" | "jsonl" => self.load_json(path)?,
            // CSV is the default
            _ => self.load_csv(path)?,
        };
        debug!(path = %path.display(), rows = df.height(), cols = df.width(), "loaded table");
        Ok(df)
    }

    /// Load the train and test feature tables from a feature directory
    pub fn load_features(&self, feature_dir: &Path, train_file: &str, test_file: &str) -> Result<(DataFrame, DataFrame)> {
        let train = self.load_auto(&feature_dir.join(train_file))?;
        let test = self.load_auto(&feature_dir.join(test_file))?;
        Ok((train, test))
    }

    /// Get file info without loading full data
    pub fn get_file_info(&self, path: &Path) -> Result<FileInfo> {
        let metadata = std::fs::metadata(path)?;
        let file_size = metadata.len();

        let is_csv = path.extension().and_then(|e| e.to_str()) == Some("csv");
        let (n_rows, columns) = if is_csv {
            let mut lines = BufReader::new(open(path)?).lines();

            let header = lines.next().transpose()?.unwrap_or_default();
            let columns: Vec<String> = header.split(',').map(|s| s.trim().to_string()).collect();
            (Some(lines.count()), Some(columns))
        } else {
            (None, None)
        };

        Ok(FileInfo {
            path: path.to_path_buf(),
            file_size,
            n_rows,
            columns,
        })
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| TourboostError::DataError(format!("{}: {}", path.display(), e)))
}

/// File information
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: PathBuf,
    pub file_size: u64,
    pub n_rows: Option<usize>,
    pub columns: Option<Vec<String>>,
}

/// Save DataFrames to disk, creating parent directories as needed
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV
    pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        let mut file = File::create(path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| TourboostError::DataError(format!("{}: {}", path.display(), e)))
    }
}
