//! Feature importance reporting

use crate::error::{Result, TourboostError};
use crate::training::{BoostedModel, ImportanceType};
use crate::utils::{DataLoader, DataSaver};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

/// Importance of a single feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScore {
    pub feature: String,
    pub score: f64,
}

/// Builds and persists feature importance tables
#[derive(Debug, Clone, Default)]
pub struct FeatureAnalyzer {
    kind: ImportanceType,
}

impl FeatureAnalyzer {
    pub fn new(kind: ImportanceType) -> Self {
        Self { kind }
    }

    /// Scores for every training feature, highest first. Equal scores keep
    /// column order.
    pub fn scores<M: BoostedModel>(&self, model: &M) -> Vec<FeatureScore> {
        let mut scores: Vec<FeatureScore> = model
            .feature_scores(self.kind)
            .into_iter()
            .map(|(feature, score)| FeatureScore { feature, score })
            .collect();
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scores
    }

    /// Importance table with `feature` and `score` columns, highest first
    pub fn to_frame(scores: &[FeatureScore]) -> Result<DataFrame> {
        let features: Vec<&str> = scores.iter().map(|s| s.feature.as_str()).collect();
        let values: Vec<f64> = scores.iter().map(|s| s.score).collect();
        let df = df!("feature" => features, "score" => values)?;
        Ok(df)
    }

    /// Compute the importance table and write it to `csv_path`
    pub fn analyze<M: BoostedModel>(&self, model: &M, csv_path: &Path) -> Result<DataFrame> {
        let scores = self.scores(model);
        let mut df = Self::to_frame(&scores)?;
        DataSaver::save_csv(&mut df, csv_path)?;
        info!(path = %csv_path.display(), features = scores.len(), "saved feature scores");
        Ok(df)
    }
}

/// Read feature names ordered by importance from the `feature` column of a
/// table, most important first
pub fn load_ranked_features(path: &Path) -> Result<Vec<String>> {
    let df = DataLoader::new().load_auto(path)?;
    let column = df
        .column("feature")
        .map_err(|_| TourboostError::FeatureNotFound(format!("feature (in {})", path.display())))?;
    let names = column
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedScores(Vec<String>, Vec<f64>);

    impl BoostedModel for FixedScores {
        fn best_iteration(&self) -> Option<usize> {
            None
        }
        fn best_score(&self) -> Option<f64> {
            None
        }
        fn num_trees(&self) -> usize {
            0
        }
        fn feature_names(&self) -> &[String] {
            &self.0
        }
        fn feature_scores(&self, _kind: ImportanceType) -> Vec<(String, f64)> {
            self.0.iter().cloned().zip(self.1.iter().copied()).collect()
        }
        fn save(&self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn model() -> FixedScores {
        FixedScores(vec!["a".into(), "b".into(), "c".into()], vec![1.0, 5.0, 1.0])
    }

    #[test]
    fn test_scores_sorted_descending() {
        let scores = FeatureAnalyzer::default().scores(&model());
        let names: Vec<&str> = scores.iter().map(|s| s.feature.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_analyze_writes_csv_and_ranks_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features/xgb_feature_score.csv");

        let df = FeatureAnalyzer::default().analyze(&model(), &path).unwrap();
        assert_eq!(df.shape(), (3, 2));

        let ranked = load_ranked_features(&path).unwrap();
        assert_eq!(ranked, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_ranked_features_requires_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "name,score\nx,1\n").unwrap();
        assert!(matches!(
            load_ranked_features(&path),
            Err(TourboostError::FeatureNotFound(_))
        ));
    }
}
