//! Model explainability module
//!
//! Feature importance reports from trained boosters, and the ranked feature
//! lists that drive feature search.

mod importance;

pub use importance::{load_ranked_features, FeatureAnalyzer, FeatureScore};
