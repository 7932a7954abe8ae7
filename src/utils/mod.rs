//! Utility functions and types

pub mod data_loader;

pub use data_loader::{DataLoader, DataSaver, FileInfo};

use crate::error::Result;
use std::path::Path;

/// Create the parent directory of `path` if it does not exist yet
pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Local time formatted as `MMDD-HHMMSS`, used to name result files
pub fn timestamp() -> String {
    chrono::Local::now().format("%m%d-%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_parent_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/file.csv");
        ensure_parent(&path).unwrap();
        assert!(dir.path().join("a/b").is_dir());

        // bare file names have no parent to create
        ensure_parent(Path::new("file.csv")).unwrap();
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = timestamp();
        assert_eq!(ts.len(), 11);
        assert_eq!(&ts[4..5], "-");
    }
}
