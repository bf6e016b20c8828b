use crate::errors::ServiceError;

/// Root-mean-square error.
pub fn rmse(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let mse = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).powi(2))
        .sum::<f64>()
        / predictions.len() as f64;
    mse.sqrt()
}

/// Mean absolute error.
pub fn mae(predictions: &[f64], targets: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| (p - t).abs())
        .sum::<f64>()
        / predictions.len() as f64
}

/// Fraction of thresholded predictions matching the labels.
pub fn accuracy(probabilities: &[f64], labels: &[bool], threshold: f64) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let hits = probabilities
        .iter()
        .zip(labels)
        .filter(|(p, l)| (**p >= threshold) == **l)
        .count();
    hits as f64 / probabilities.len() as f64
}

/// Area under the ROC curve via the rank-sum (Mann-Whitney) formulation,
/// with tied scores receiving averaged ranks.
pub fn auc(scores: &[f64], labels: &[bool]) -> Result<f64, ServiceError> {
    let n_pos = labels.iter().filter(|l| **l).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(ServiceError::Model(
            "AUC is undefined when the evaluation split has a single class".to_string(),
        ));
    }

    let mut paired: Vec<(f64, bool)> = scores.iter().copied().zip(labels.iter().copied()).collect();
    paired.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rank_sum_pos = 0.0;
    let mut i = 0;
    while i < paired.len() {
        let mut j = i;
        while j < paired.len() && paired[j].0 == paired[i].0 {
            j += 1;
        }
        // Ranks are 1-based; ties share the average rank of their block.
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for item in &paired[i..j] {
            if item.1 {
                rank_sum_pos += avg_rank;
            }
        }
        i = j;
    }

    let n_pos_f = n_pos as f64;
    let n_neg_f = n_neg as f64;
    Ok((rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg_f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rmse_and_mae_on_known_residuals() {
        let pred = vec![1.0, 2.0, 3.0];
        let target = vec![1.0, 4.0, 3.0];
        assert!((mae(&pred, &target) - 2.0 / 3.0).abs() < 1e-12);
        assert!((rmse(&pred, &target) - (4.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn perfect_ranking_has_auc_one() {
        let scores = vec![0.1, 0.2, 0.8, 0.9];
        let labels = vec![false, false, true, true];
        assert!((auc(&scores, &labels).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn inverted_ranking_has_auc_zero() {
        let scores = vec![0.9, 0.8, 0.2, 0.1];
        let labels = vec![false, false, true, true];
        assert!(auc(&scores, &labels).unwrap().abs() < 1e-12);
    }

    #[test]
    fn tied_scores_average_to_half() {
        let scores = vec![0.5, 0.5, 0.5, 0.5];
        let labels = vec![true, false, true, false];
        assert!((auc(&scores, &labels).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_class_split_is_an_error() {
        assert!(auc(&[0.1, 0.9], &[true, true]).is_err());
    }

    #[test]
    fn accuracy_respects_threshold() {
        let probs = vec![0.3, 0.6, 0.9];
        let labels = vec![false, false, true];
        assert!((accuracy(&probs, &labels, 0.5) - 2.0 / 3.0).abs() < 1e-12);
        assert!((accuracy(&probs, &labels, 0.7) - 1.0).abs() < 1e-12);
    }
}
