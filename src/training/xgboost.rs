//! XGBoost-style gradient boosting with second-order approximation
//!
//! Key properties:
//! - Uses both gradient (first derivative) and hessian (second derivative) of the logistic loss
//! - Regularized leaf weights: w* = -G / (H + lambda), soft-thresholded by alpha
//! - Gain-based split scoring: Gain = 0.5 * [GL²/(HL+λ) + GR²/(HR+λ) - (GL+GR)²/(HL+HR+λ)]
//! - Splits must exceed gamma and leave at least `min_child_weight` hessian on each side
//! - Row and column subsampling per tree, seeded for reproducibility
//! - Per-round evaluation with early stopping, and lockstep k-fold cross-validation

use super::booster::{BoostedModel, Booster, CvOptions, CvRecord, CvTable, ImportanceType};
use super::config::BoostParams;
use super::cross_validation::{CVStrategy, CrossValidator};
use super::matrix::{DMatrix, FeatureMatrix};
use super::metrics;
use crate::error::{Result, TourboostError};
use crate::utils::ensure_parent;
use ndarray::{Array1, Array2};
use rand::prelude::*;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A single node in a boosted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
enum XGBNode {
    Leaf { weight: f64 },
    Split {
        feature: usize,
        threshold: f64,
        gain: f64,
        /// Side taken by missing (NaN) values
        default_left: bool,
        left: Box<XGBNode>,
        right: Box<XGBNode>,
    },
}

impl XGBNode {
    fn predict_row(&self, x: &Array2<f64>, row: usize) -> f64 {
        match self {
            XGBNode::Leaf { weight } => *weight,
            XGBNode::Split { feature, threshold, default_left, left, right, .. } => {
                if goes_left(x[[row, *feature]], *threshold, *default_left) {
                    left.predict_row(x, row)
                } else {
                    right.predict_row(x, row)
                }
            }
        }
    }

    fn accumulate_scores(&self, kind: ImportanceType, scores: &mut [f64]) {
        if let XGBNode::Split { feature, gain, left, right, .. } = self {
            if let Some(slot) = scores.get_mut(*feature) {
                *slot += match kind {
                    ImportanceType::Weight => 1.0,
                    ImportanceType::Gain => *gain,
                };
            }
            left.accumulate_scores(kind, scores);
            right.accumulate_scores(kind, scores);
        }
    }
}

fn goes_left(value: f64, threshold: f64, default_left: bool) -> bool {
    if value.is_nan() {
        default_left
    } else {
        value <= threshold
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    gain: f64,
    default_left: bool,
}

/// Build a tree using exact greedy split finding
fn build_xgb_tree(
    x: &Array2<f64>,
    grad: &Array1<f64>,
    hess: &Array1<f64>,
    indices: &[usize],
    feature_indices: &[usize],
    depth: usize,
    params: &BoostParams,
) -> XGBNode {
    let g_sum: f64 = indices.iter().map(|&i| grad[i]).sum();
    let h_sum: f64 = indices.iter().map(|&i| hess[i]).sum();

    let leaf_weight = compute_leaf_weight(g_sum, h_sum, params.reg_lambda, params.reg_alpha);

    if depth >= params.max_depth || indices.len() < 2 || h_sum < params.min_child_weight {
        return XGBNode::Leaf { weight: leaf_weight };
    }

    // Ties go to the lower feature index so parallel reduction is deterministic
    let best_split = feature_indices
        .par_iter()
        .filter_map(|&f| find_best_split_for_feature(x, grad, hess, indices, f, params))
        .max_by(|a, b| {
            a.gain
                .total_cmp(&b.gain)
                .then_with(|| b.feature.cmp(&a.feature))
        });

    match best_split {
        Some(split) if split.gain > params.gamma => {
            let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
                indices
                    .iter()
                    .partition(|&&i| goes_left(x[[i, split.feature]], split.threshold, split.default_left));

            if left_idx.is_empty() || right_idx.is_empty() {
                return XGBNode::Leaf { weight: leaf_weight };
            }

            let left = build_xgb_tree(x, grad, hess, &left_idx, feature_indices, depth + 1, params);
            let right = build_xgb_tree(x, grad, hess, &right_idx, feature_indices, depth + 1, params);

            XGBNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                gain: split.gain,
                default_left: split.default_left,
                left: Box::new(left),
                right: Box::new(right),
            }
        }
        _ => XGBNode::Leaf { weight: leaf_weight },
    }
}

/// Optimal leaf weight with L1 (alpha) and L2 (lambda) regularization
fn compute_leaf_weight(g_sum: f64, h_sum: f64, lambda: f64, alpha: f64) -> f64 {
    let denom = h_sum + lambda;
    if denom <= 0.0 {
        return 0.0;
    }
    if alpha > 0.0 {
        // Soft-threshold for L1
        let g_adj = if g_sum > alpha {
            g_sum - alpha
        } else if g_sum < -alpha {
            g_sum + alpha
        } else {
            return 0.0;
        };
        -g_adj / denom
    } else {
        -g_sum / denom
    }
}

/// Find best split for a single feature using exact greedy method.
///
/// NaN values are treated as missing: thresholds are scanned over the
/// present values only, and the missing block is tried on both sides.
fn find_best_split_for_feature(
    x: &Array2<f64>,
    grad: &Array1<f64>,
    hess: &Array1<f64>,
    indices: &[usize],
    feature: usize,
    params: &BoostParams,
) -> Option<SplitCandidate> {
    let (mut present, missing): (Vec<usize>, Vec<usize>) =
        indices.iter().partition(|&&i| !x[[i, feature]].is_nan());
    present.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

    let g_total: f64 = indices.iter().map(|&i| grad[i]).sum();
    let h_total: f64 = indices.iter().map(|&i| hess[i]).sum();
    let g_missing: f64 = missing.iter().map(|&i| grad[i]).sum();
    let h_missing: f64 = missing.iter().map(|&i| hess[i]).sum();
    let lambda = params.reg_lambda;
    let parent_score = (g_total * g_total) / (h_total + lambda);

    let mut g_left = 0.0;
    let mut h_left = 0.0;
    let mut best: Option<SplitCandidate> = None;

    for pos in 0..present.len() {
        let idx = present[pos];
        g_left += grad[idx];
        h_left += hess[idx];

        let value = x[[idx, feature]];
        let threshold = match present.get(pos + 1) {
            Some(&next_idx) => {
                let next_value = x[[next_idx, feature]];
                if (next_value - value).abs() < 1e-12 {
                    continue;
                }
                (value + next_value) / 2.0
            }
            // All present values left; only useful with missing values right
            None if !missing.is_empty() => value,
            None => break,
        };

        // Missing values right, then (unless right would be empty) left
        let missing_left = (pos + 1 < present.len() && !missing.is_empty())
            .then_some((g_left + g_missing, h_left + h_missing, true));

        for (gl, hl, default_left) in [Some((g_left, h_left, false)), missing_left].into_iter().flatten() {
            let gr = g_total - gl;
            let hr = h_total - hl;
            if hl < params.min_child_weight || hr < params.min_child_weight {
                continue;
            }

            let gain = 0.5 * ((gl * gl) / (hl + lambda) + (gr * gr) / (hr + lambda) - parent_score);

            if best.map_or(true, |b| gain > b.gain) {
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    gain,
                    default_left,
                });
            }
        }
    }

    best
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn subsample(rng: &mut Xoshiro256PlusPlus, n: usize, ratio: f64) -> Vec<usize> {
    if ratio >= 1.0 {
        return (0..n).collect();
    }
    let k = ((n as f64) * ratio).ceil() as usize;
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(k.max(1));
    indices.sort_unstable();
    indices
}

fn check_same_features(expected: &[String], actual: &[String]) -> Result<()> {
    if expected != actual {
        return Err(TourboostError::FeatureMismatch {
            expected: expected.join(", "),
            actual: actual.join(", "),
        });
    }
    Ok(())
}

// ─── Model ─────────────────────────────────────────────────────────────────

/// Trained binary logistic booster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XGBoostModel {
    feature_names: Vec<String>,
    learning_rate: f64,
    /// Initial prediction in log-odds space
    base_score: f64,
    trees: Vec<XGBNode>,
    best_iteration: Option<usize>,
    best_score: Option<f64>,
}

impl XGBoostModel {
    fn tree_margin(&self, tree: &XGBNode, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_shape_fn(x.nrows(), |row| self.learning_rate * tree.predict_row(x, row))
    }

    /// Raw log-odds for every row
    pub fn predict_margin(&self, data: &FeatureMatrix) -> Result<Array1<f64>> {
        check_same_features(&self.feature_names, data.names())?;
        let x = data.values();
        let mut raw = Array1::from_elem(x.nrows(), self.base_score);
        for tree in &self.trees {
            raw += &self.tree_margin(tree, x);
        }
        Ok(raw)
    }

    /// Positive-class probability for every row
    pub fn predict_proba(&self, data: &FeatureMatrix) -> Result<Array1<f64>> {
        Ok(self.predict_margin(data)?.mapv(sigmoid))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Load a model previously written by [`BoostedModel::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl BoostedModel for XGBoostModel {
    fn best_iteration(&self) -> Option<usize> {
        self.best_iteration
    }

    fn best_score(&self) -> Option<f64> {
        self.best_score
    }

    fn num_trees(&self) -> usize {
        self.trees.len()
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn feature_scores(&self, kind: ImportanceType) -> Vec<(String, f64)> {
        let mut scores = vec![0.0; self.feature_names.len()];
        for tree in &self.trees {
            tree.accumulate_scores(kind, &mut scores);
        }
        self.feature_names.iter().cloned().zip(scores).collect()
    }

    fn save(&self, path: &Path) -> Result<()> {
        ensure_parent(path)?;
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

// ─── Training session ──────────────────────────────────────────────────────

/// Incremental boosting state over one labelled training set
struct BoostingSession<'a> {
    params: &'a BoostParams,
    x: &'a Array2<f64>,
    y: &'a Array1<f64>,
    raw: Array1<f64>,
    rng: Xoshiro256PlusPlus,
    model: XGBoostModel,
}

impl<'a> BoostingSession<'a> {
    fn new(params: &'a BoostParams, dtrain: &'a DMatrix, seed: u64) -> Result<Self> {
        let y = dtrain.label().ok_or_else(|| {
            TourboostError::TrainingError("training data has no labels".to_string())
        })?;
        if dtrain.num_row() == 0 {
            return Err(TourboostError::TrainingError("training data is empty".to_string()));
        }

        let p = y.mean().unwrap_or(0.5).clamp(1e-7, 1.0 - 1e-7);
        let base_score = (p / (1.0 - p)).ln();

        Ok(Self {
            params,
            x: dtrain.features().values(),
            y,
            raw: Array1::from_elem(dtrain.num_row(), base_score),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            model: XGBoostModel {
                feature_names: dtrain.features().names().to_vec(),
                learning_rate: params.learning_rate,
                base_score,
                trees: Vec::new(),
                best_iteration: None,
                best_score: None,
            },
        })
    }

    /// Grow one tree on the current gradients
    fn step(&mut self) {
        let spw = self.params.scale_pos_weight;
        let probs = self.raw.mapv(sigmoid);
        let weights = self.y.mapv(|y| if y > 0.5 { spw } else { 1.0 });

        // Logistic loss: grad = p - y, hess = p * (1 - p)
        let grad: Array1<f64> = (&probs - self.y) * &weights;
        let hess: Array1<f64> = probs.mapv(|p| (p * (1.0 - p)).max(1e-16)) * &weights;

        let (n_rows, n_cols) = self.x.dim();
        let row_indices = subsample(&mut self.rng, n_rows, self.params.subsample);
        let col_indices = subsample(&mut self.rng, n_cols, self.params.colsample_bytree);

        let tree = build_xgb_tree(self.x, &grad, &hess, &row_indices, &col_indices, 0, self.params);
        self.raw += &self.model.tree_margin(&tree, self.x);
        self.model.trees.push(tree);
    }

    fn train_score(&self) -> f64 {
        metrics::evaluate(self.params.eval_metric, self.y, &self.raw.mapv(sigmoid))
    }

    fn latest_tree(&self) -> &XGBNode {
        &self.model.trees[self.model.trees.len() - 1]
    }
}

/// Running margins for a labelled evaluation set
struct EvalCache<'a> {
    name: &'a str,
    data: &'a DMatrix,
    label: &'a Array1<f64>,
    raw: Array1<f64>,
}

impl<'a> EvalCache<'a> {
    fn new(name: &'a str, data: &'a DMatrix, train_names: &[String], base_score: f64) -> Result<Self> {
        check_same_features(train_names, data.features().names())?;
        let label = data.label().ok_or_else(|| {
            TourboostError::TrainingError(format!("eval set '{}' has no labels", name))
        })?;
        Ok(Self {
            name,
            data,
            label,
            raw: Array1::from_elem(data.num_row(), base_score),
        })
    }
}

/// One cross-validation fold advanced in lockstep with the others
struct CvFold<'a> {
    session: BoostingSession<'a>,
    test: &'a DMatrix,
    test_label: &'a Array1<f64>,
    test_raw: Array1<f64>,
}

impl CvFold<'_> {
    /// Add one tree, returning (train, test) metric values
    fn advance(&mut self) -> (f64, f64) {
        self.session.step();
        let tree = self.session.latest_tree();
        self.test_raw += &self
            .session
            .model
            .tree_margin(tree, self.test.features().values());
        let test_score = metrics::evaluate(
            self.session.params.eval_metric,
            self.test_label,
            &self.test_raw.mapv(sigmoid),
        );
        (self.session.train_score(), test_score)
    }
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

// ─── Backend ───────────────────────────────────────────────────────────────

/// Native XGBoost-style backend
#[derive(Debug, Clone, Copy, Default)]
pub struct XGBoostBooster;

impl XGBoostBooster {
    pub fn new() -> Self {
        Self
    }
}

impl Booster for XGBoostBooster {
    type Model = XGBoostModel;

    fn train(
        &self,
        params: &BoostParams,
        dtrain: &DMatrix,
        num_boost_round: usize,
        evals: &[(&DMatrix, &str)],
        early_stopping_rounds: Option<usize>,
        seed: u64,
    ) -> Result<XGBoostModel> {
        params.validate()?;
        if early_stopping_rounds.is_some() && evals.is_empty() {
            return Err(TourboostError::TrainingError(
                "early stopping requires at least one eval set".to_string(),
            ));
        }

        let mut session = BoostingSession::new(params, dtrain, seed)?;
        let base_score = session.model.base_score;
        let mut caches = evals
            .iter()
            .map(|&(data, name)| EvalCache::new(name, data, dtrain.features().names(), base_score))
            .collect::<Result<Vec<_>>>()?;

        let metric = params.eval_metric;
        let mut best: Option<(usize, f64)> = None;

        for round in 0..num_boost_round {
            session.step();
            if caches.is_empty() {
                continue;
            }

            let tree = session.latest_tree();
            let mut line = format!("[{}]", round);
            let mut watched = f64::NAN;
            for cache in caches.iter_mut() {
                cache.raw += &session.model.tree_margin(tree, cache.data.features().values());
                watched = metrics::evaluate(metric, cache.label, &cache.raw.mapv(sigmoid));
                line.push_str(&format!("\t{}-{}:{:.5}", cache.name, metric, watched));
            }
            if params.silent {
                debug!("{}", line);
            } else {
                info!("{}", line);
            }

            match best {
                Some((best_round, best_score)) if !metric.improves(watched, best_score) => {
                    if let Some(patience) = early_stopping_rounds {
                        if round - best_round >= patience {
                            debug!(round, best_round, "early stopping");
                            break;
                        }
                    }
                }
                _ => best = Some((round, watched)),
            }
        }

        if let Some((best_round, best_score)) = best {
            session.model.best_iteration = Some(best_round);
            session.model.best_score = Some(best_score);
        }
        Ok(session.model)
    }

    fn cv(
        &self,
        params: &BoostParams,
        dtrain: &DMatrix,
        num_boost_round: usize,
        options: &CvOptions,
    ) -> Result<CvTable> {
        params.validate()?;
        let label = dtrain.label().ok_or_else(|| {
            TourboostError::TrainingError("cross-validation data has no labels".to_string())
        })?;

        let strategy = if options.stratified {
            CVStrategy::StratifiedKFold { n_splits: options.nfold, shuffle: true }
        } else {
            CVStrategy::KFold { n_splits: options.nfold, shuffle: true }
        };
        let splits = CrossValidator::new(strategy)
            .with_random_state(options.seed)
            .split(dtrain.num_row(), Some(label))?;

        let fold_data: Vec<(DMatrix, DMatrix)> = splits
            .iter()
            .map(|s| (dtrain.slice(&s.train_indices), dtrain.slice(&s.test_indices)))
            .collect();

        let mut folds = fold_data
            .iter()
            .map(|(train, test)| {
                let session = BoostingSession::new(params, train, options.seed)?;
                let test_label = test.label().ok_or_else(|| {
                    TourboostError::TrainingError("fold has no labels".to_string())
                })?;
                let test_raw = Array1::from_elem(test.num_row(), session.model.base_score);
                Ok(CvFold { session, test, test_label, test_raw })
            })
            .collect::<Result<Vec<_>>>()?;

        let metric = params.eval_metric;
        let mut table = CvTable::new(metric);
        let mut best: Option<(usize, f64)> = None;

        for round in 0..num_boost_round {
            let scores: Vec<(f64, f64)> = folds.par_iter_mut().map(|f| f.advance()).collect();
            let train: Vec<f64> = scores.iter().map(|s| s.0).collect();
            let test: Vec<f64> = scores.iter().map(|s| s.1).collect();
            let (train_mean, train_std) = mean_std(&train);
            let (test_mean, test_std) = mean_std(&test);
            table.rows.push(CvRecord { train_mean, train_std, test_mean, test_std });

            let line = format!(
                "[{}]\ttrain-{}-mean:{:.5}\ttest-{}-mean:{:.5}",
                round, metric, train_mean, metric, test_mean
            );
            if params.silent {
                debug!("{}", line);
            } else {
                info!("{}", line);
            }

            match best {
                Some((best_round, best_score)) if !metric.improves(test_mean, best_score) => {
                    if let Some(patience) = options.early_stopping_rounds {
                        if round - best_round >= patience {
                            debug!(round, best_round, "cv early stopping");
                            break;
                        }
                    }
                }
                _ => best = Some((round, test_mean)),
            }
        }

        if options.early_stopping_rounds.is_some() {
            if let Some((best_round, _)) = best {
                table.rows.truncate(best_round + 1);
            }
        }
        Ok(table)
    }

    fn predict(&self, model: &XGBoostModel, data: &DMatrix) -> Result<Array1<f64>> {
        model.predict_proba(data.features())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::config::EvalMetric;

    fn classification_data(n: usize) -> DMatrix {
        let x = Array2::from_shape_fn((n, 3), |(i, j)| ((i * 7 + j * 13) % n) as f64 / n as f64 + i as f64 * 0.01 * j as f64);
        let y: Array1<f64> = x
            .rows()
            .into_iter()
            .map(|r| if r[0] + 0.5 * r[2] > 0.7 { 1.0 } else { 0.0 })
            .collect();
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        DMatrix::with_label(FeatureMatrix::new(names, x).unwrap(), y).unwrap()
    }

    fn small_params() -> BoostParams {
        BoostParams {
            learning_rate: 0.3,
            min_child_weight: 0.5,
            subsample: 1.0,
            colsample_bytree: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_train_fits_training_data() {
        let data = classification_data(60);
        let model = XGBoostBooster.train(&small_params(), &data, 30, &[], None, 0).unwrap();
        assert_eq!(model.num_trees(), 30);
        let proba = XGBoostBooster.predict(&model, &data).unwrap();
        assert!(proba.iter().all(|&p| (0.0..=1.0).contains(&p)));
        let auc = metrics::roc_auc(data.label().unwrap(), &proba).unwrap();
        assert!(auc > 0.9, "train auc = {}", auc);
    }

    #[test]
    fn test_early_stopping_records_best() {
        let data = classification_data(80);
        let valid = data.slice(&(0..20).collect::<Vec<_>>());
        let model = XGBoostBooster
            .train(&small_params(), &data, 200, &[(&data, "train"), (&valid, "valid")], Some(5), 1)
            .unwrap();
        let best = model.best_iteration().unwrap();
        assert!(model.best_score().is_some());
        assert!(model.num_trees() <= best + 1 + 5);
    }

    #[test]
    fn test_early_stopping_needs_evals() {
        let data = classification_data(20);
        assert!(XGBoostBooster.train(&small_params(), &data, 5, &[], Some(3), 0).is_err());
    }

    #[test]
    fn test_cv_rows_match_best_round() {
        let data = classification_data(60);
        let options = CvOptions { nfold: 3, seed: 3, stratified: false, early_stopping_rounds: Some(4) };
        let table = XGBoostBooster.cv(&small_params(), &data, 100, &options).unwrap();
        assert!(table.n_rows() >= 1);
        assert_eq!(table.metric, EvalMetric::Auc);

        // Truncated at the best round: no later row beats the last one
        let last = table.last_test_mean().unwrap();
        assert!(table.rows.iter().all(|r| r.test_mean <= last));
    }

    #[test]
    fn test_predict_rejects_feature_mismatch() {
        let data = classification_data(30);
        let model = XGBoostBooster.train(&small_params(), &data, 3, &[], None, 0).unwrap();
        let dropped = DMatrix::new(data.features().drop_columns(&["b".to_string()]));
        let err = XGBoostBooster.predict(&model, &dropped).unwrap_err();
        assert!(matches!(err, TourboostError::FeatureMismatch { .. }));
    }

    #[test]
    fn test_feature_scores_cover_every_feature() {
        let data = classification_data(60);
        let model = XGBoostBooster.train(&small_params(), &data, 10, &[], None, 0).unwrap();
        let weights = model.feature_scores(ImportanceType::Weight);
        assert_eq!(weights.len(), 3);
        assert!(weights.iter().all(|(_, s)| *s >= 0.0));
        assert!(weights.iter().map(|(_, s)| s).sum::<f64>() > 0.0);

        let gains = model.feature_scores(ImportanceType::Gain);
        assert!(gains.iter().map(|(_, s)| s).sum::<f64>() > 0.0);
    }

    #[test]
    fn test_model_bytes_round_trip_predictions() {
        let data = classification_data(40);
        let model = XGBoostBooster.train(&small_params(), &data, 5, &[], None, 0).unwrap();
        let restored = XGBoostModel::from_bytes(&model.to_bytes().unwrap()).unwrap();
        assert_eq!(
            model.predict_proba(data.features()).unwrap(),
            restored.predict_proba(data.features()).unwrap()
        );
    }

    #[test]
    fn test_missing_values_are_split_on() {
        let n = 40;
        let x = Array2::from_shape_fn((n, 2), |(i, j)| match j {
            0 if i % 4 == 0 => f64::NAN,
            0 => (i % 7) as f64,
            _ => (i % 5) as f64,
        });
        let y = Array1::from_shape_fn(n, |i| if i % 4 == 0 { 1.0 } else { 0.0 });
        let names = vec!["f_nan".to_string(), "f_weak".to_string()];
        let d = DMatrix::with_label(FeatureMatrix::new(names, x).unwrap(), y.clone()).unwrap();

        let params = BoostParams { min_child_weight: 0.0, ..small_params() };
        let model = XGBoostBooster.train(&params, &d, 20, &[], None, 0).unwrap();

        let scores = model.feature_scores(ImportanceType::Weight);
        assert_eq!(scores[0].0, "f_nan");
        assert!(scores[0].1 > 0.0, "column with missing values should be used");

        let pred = XGBoostBooster.predict(&model, &d).unwrap();
        assert!(pred.iter().all(|p| p.is_finite()));
        assert!(metrics::roc_auc(&y, &pred).unwrap() > 0.95);
    }

    #[test]
    fn test_missing_values_follow_default_direction() {
        let x = ndarray::array![[1.0], [2.0], [f64::NAN]];
        assert!(goes_left(x[[0, 0]], 1.5, false));
        assert!(!goes_left(x[[1, 0]], 1.5, true));
        assert!(goes_left(x[[2, 0]], 1.5, true));
        assert!(!goes_left(x[[2, 0]], 1.5, false));
    }

    #[test]
    fn test_leaf_weight_regularization() {
        assert_eq!(compute_leaf_weight(2.0, 1.0, 1.0, 0.0), -1.0);
        assert_eq!(compute_leaf_weight(0.5, 1.0, 1.0, 1.0), 0.0);
        assert_eq!(compute_leaf_weight(3.0, 1.0, 1.0, 1.0), -1.0);
    }
}
