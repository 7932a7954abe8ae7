//! Evaluation metrics for binary classifiers

use super::config::EvalMetric;
use ndarray::Array1;

const EPS: f64 = 1e-15;

/// ROC AUC via the Mann-Whitney statistic, with midranks for tied scores.
///
/// Returns `None` when `y_true` holds a single class.
pub fn roc_auc(y_true: &Array1<f64>, scores: &Array1<f64>) -> Option<f64> {
    let n = y_true.len();
    let n_pos = y_true.iter().filter(|&&y| y > 0.5).count();
    let n_neg = n - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut pos_rank_sum = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // ranks are 1-based; tied block i..=j shares the mean rank
        let midrank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            if y_true[idx] > 0.5 {
                pos_rank_sum += midrank;
            }
        }
        i = j + 1;
    }

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Some((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Mean binary cross-entropy
pub fn log_loss(y_true: &Array1<f64>, probs: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let total: f64 = y_true
        .iter()
        .zip(probs.iter())
        .map(|(&y, &p)| {
            let p = p.clamp(EPS, 1.0 - EPS);
            -(y * p.ln() + (1.0 - y) * (1.0 - p).ln())
        })
        .sum();
    total / y_true.len() as f64
}

/// Fraction of samples misclassified at threshold 0.5
pub fn error_rate(y_true: &Array1<f64>, probs: &Array1<f64>) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let wrong = y_true
        .iter()
        .zip(probs.iter())
        .filter(|&(&y, &p)| (p > 0.5) != (y > 0.5))
        .count();
    wrong as f64 / y_true.len() as f64
}

/// Score `probs` against `y_true` with the given metric.
/// An AUC over a single class scores 0.5.
pub fn evaluate(metric: EvalMetric, y_true: &Array1<f64>, probs: &Array1<f64>) -> f64 {
    match metric {
        EvalMetric::Auc => roc_auc(y_true, probs).unwrap_or(0.5),
        EvalMetric::Logloss => log_loss(y_true, probs),
        EvalMetric::Error => error_rate(y_true, probs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_auc_perfect_and_inverted() {
        let y = array![0.0, 0.0, 1.0, 1.0];
        assert_eq!(roc_auc(&y, &array![0.1, 0.2, 0.8, 0.9]), Some(1.0));
        assert_eq!(roc_auc(&y, &array![0.9, 0.8, 0.2, 0.1]), Some(0.0));
    }

    #[test]
    fn test_auc_hand_computed() {
        // pairs (pos, neg): (0.35 vs 0.1) win, (0.35 vs 0.4) lose,
        // (0.8 vs 0.1) win, (0.8 vs 0.4) win => 3/4
        let y = array![0.0, 0.0, 1.0, 1.0];
        let s = array![0.1, 0.4, 0.35, 0.8];
        assert!((roc_auc(&y, &s).unwrap() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_auc_ties_count_half() {
        let y = array![0.0, 1.0];
        assert_eq!(roc_auc(&y, &array![0.5, 0.5]), Some(0.5));

        let y = array![0.0, 0.0, 1.0];
        // pos 0.5 vs neg 0.5 tie (0.5) and vs neg 0.2 win (1) => 0.75
        assert_eq!(roc_auc(&y, &array![0.5, 0.2, 0.5]), Some(0.75));
    }

    #[test]
    fn test_auc_single_class() {
        let y = array![1.0, 1.0];
        assert_eq!(roc_auc(&y, &array![0.3, 0.7]), None);
        assert_eq!(evaluate(EvalMetric::Auc, &y, &array![0.3, 0.7]), 0.5);
    }

    #[test]
    fn test_log_loss_and_error() {
        let y = array![1.0, 0.0];
        let p = array![0.9, 0.2];
        let expected = -(0.9f64.ln() + 0.8f64.ln()) / 2.0;
        assert!((log_loss(&y, &p) - expected).abs() < 1e-12);
        assert_eq!(error_rate(&y, &p), 0.0);
        assert_eq!(error_rate(&y, &array![0.1, 0.2]), 0.5);
    }
}
